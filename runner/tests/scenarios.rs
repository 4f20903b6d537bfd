//! Scenario runs against an in-memory fake database.
//!
//! The fake understands three statements, `CLEAR`, `INSERT <id> <name>` and
//! the query `SELECT items`, and shares its store with the service so that
//! arrange statements and method calls see the same data.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use dbtest_runner::prelude::*;
use dbtest_runner::DatabaseResult;
use pretty_assertions::assert_eq;

type Store = Rc<RefCell<BTreeMap<i64, String>>>;

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: i64,
    name: String,
}

struct Shelf {
    label: String,
    item: Box<Item>,
}

struct ItemService;

describe_record!("shop" :: Item { id: i64, name: String });
describe_record!("shop" :: Shelf { label: String, item: Box<Item> });
describe_record!("shop" :: ItemService {});

struct FakeDatabase {
    store: Store,
    executed: Vec<String>,
}

impl FakeDatabase {
    fn new(store: Store) -> Self {
        Self {
            store,
            executed: Vec::new(),
        }
    }
}

impl Database for FakeDatabase {
    fn execute(&mut self, statement: &str) -> DatabaseResult<()> {
        self.executed.push(statement.to_string());
        let words: Vec<&str> = statement.split_whitespace().collect();
        match words.as_slice() {
            ["CLEAR"] => {
                self.store.borrow_mut().clear();
                Ok(())
            }
            ["INSERT", id, name] => {
                let id = id
                    .parse()
                    .map_err(|_| DatabaseError::new(format!("bad id '{}'", id)))?;
                self.store.borrow_mut().insert(id, name.to_string());
                Ok(())
            }
            _ => Err(DatabaseError::new(format!(
                "syntax error near '{}'",
                statement
            ))),
        }
    }

    fn query<'a>(&'a mut self, query: &str) -> DatabaseResult<Box<dyn Cursor + 'a>> {
        if query != "SELECT items" {
            return Err(DatabaseError::new(format!("no such query '{}'", query)));
        }
        let rows = self
            .store
            .borrow()
            .iter()
            .map(|(id, name)| vec![Value::Int(*id), Value::from(name.as_str())])
            .collect();
        Ok(Box::new(MaterializedCursor::new(
            vec![Column::new("id"), Column::new("name")],
            rows,
        )))
    }
}

fn item_service(store: Store) -> MethodTable {
    let get_store = store.clone();
    let put_store = store.clone();
    MethodTable::for_type::<ItemService>()
        .method("Get", move |_ctx: Context, id: i64| {
            get_store
                .borrow()
                .get(&id)
                .cloned()
                .ok_or_else(|| format!("item {} not found", id))
        })
        .method("Put", move |_ctx: Context, item: Item| {
            if item.name.is_empty() {
                return Err("name is required".to_string());
            }
            put_store.borrow_mut().insert(item.id, item.name);
            Ok(())
        })
        .method("Describe", |_ctx: Context, shelf: Shelf| {
            Ok::<_, String>(format!("{}:{}:{}", shelf.label, shelf.item.id, shelf.item.name))
        })
        .method("Find", move |_ctx: Context, ids: Vec<i64>| {
            let items = store.borrow();
            Ok::<_, String>(
                ids.into_iter()
                    .filter_map(|id| items.get(&id).map(|name| Item { id, name: name.clone() }))
                    .collect::<Vec<_>>(),
            )
        })
}

fn fixture() -> (FakeDatabase, MethodTable) {
    let store = Store::default();
    (FakeDatabase::new(store.clone()), item_service(store))
}

fn run(yaml: &str) -> (FakeDatabase, RunResult<()>) {
    let (mut db, service) = fixture();
    let set = TestSet::from_yaml_str(yaml).unwrap();
    let result = set.run(&mut db, &service);
    (db, result)
}

// ========== TEST: return_value ==========
#[test]
fn test_return_value() {
    let (_, result) = run(r#"
tests:
  - name: get existing
    arrange:
      - statement: INSERT 1 a
    act:
      method: Get
      arguments:
        - { type: context, value: background }
        - { type: int, value: 1 }
    assert:
      - value: { type: string, value: a }
"#);
    result.unwrap();
}

// ========== TEST: return_value_mismatch ==========
#[test]
fn test_return_value_mismatch() {
    let (_, result) = run(r#"
tests:
  - name: get existing
    arrange:
      - statement: INSERT 1 b
    act:
      method: Get
      arguments:
        - { type: context, value: background }
        - { type: int, value: 1 }
    assert:
      - value: { type: string, value: a }
"#);
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "get existing: return values not equal: 'a' /= 'b'");
    assert_eq!(err.failure_kind(), Some(FailureKind::ValueMismatch));
}

// ========== TEST: expected_error ==========
#[test]
fn test_expected_error() {
    let (_, result) = run(r#"
tests:
  - name: get missing
    act:
      method: Get
      arguments:
        - { type: context, value: background }
        - { type: int, value: 9 }
    assert:
      - error: item 9 not found
"#);
    result.unwrap();
}

// ========== TEST: unexpected_error ==========
#[test]
fn test_unexpected_error() {
    let (_, result) = run(r#"
tests:
  - name: get missing
    act:
      method: Get
      arguments:
        - { type: context, value: background }
        - { type: int, value: 9 }
    assert:
      - query: SELECT items
"#);
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "get missing: unexpected error: item 9 not found");
}

// ========== TEST: different_error ==========
#[test]
fn test_different_error() {
    let (_, result) = run(r#"
tests:
  - name: empty name
    act:
      method: Put
      arguments:
        - { type: context, value: background }
        - type: shop.Item
          value:
            id: { type: int, value: 1 }
    assert:
      - error: item exists
"#);
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "empty name: different error: 'item exists' /= 'name is required'"
    );
}

// ========== TEST: structured_and_document_arguments ==========
#[test]
fn test_structured_and_document_arguments() {
    let (_, result) = run(r#"
tests:
  - name: put structured
    arrange:
      - statement: CLEAR
    act:
      method: Put
      arguments:
        - { type: context, value: background }
        - type: shop.Item
          value:
            Id: { type: int, value: 2 }
            name: { type: string, value: chair }
    assert:
      - query: SELECT items
        rows:
          - columns: [{ type: int, value: 2 }, { type: string, value: chair }]
  - name: put document
    act:
      method: Put
      arguments:
        - { type: context, value: background }
        - { type: shop.Item, value: '{"id": 1, "name": "desk"}' }
    assert:
      - query: SELECT items
        rows:
          - columns: [{ type: int, value: 1 }, { type: string, value: desk }]
          - columns: [{ type: int, value: 2 }, { type: string, value: chair }]
"#);
    result.unwrap();
}

// ========== TEST: sparse_record_with_boxed_field ==========
#[test]
fn test_sparse_record_with_boxed_field() {
    // GIVEN a record whose boxed field is left out in both forms
    let (_, result) = run(r#"
tests:
  - name: structured shelf
    act:
      method: Describe
      arguments:
        - { type: context, value: background }
        - type: shop.Shelf
          value:
            label: { type: string, value: top }
    assert:
      - value: { type: string, value: "top:0:" }
  - name: document shelf
    act:
      method: Describe
      arguments:
        - { type: context, value: background }
        - { type: shop.Shelf, value: '{"label": "low"}' }
    assert:
      - value: { type: string, value: "low:0:" }
"#);

    // THEN the boxed record holds its zero value
    result.unwrap();
}

// ========== TEST: list_of_records ==========
#[test]
fn test_list_of_records() {
    let (_, result) = run(r#"
tests:
  - name: find
    arrange:
      - statement: INSERT 1 a
      - statement: INSERT 2 b
    act:
      method: Find
      arguments:
        - { type: context, value: background }
        - type: array
          value: [{ type: int, value: 2 }, { type: int, value: 1 }]
    assert:
      - value:
          type: array
          value:
            - { type: shop.Item, value: '{"id": 2, "name": "b"}' }
            - { type: shop.Item, value: { id: { type: int, value: 1 }, name: { type: string, value: a } } }
"#);
    result.unwrap();
}

// ========== TEST: row_count ==========
#[test]
fn test_row_count() {
    let scenario = |arrange: &[&str]| {
        let mut scenario = Scenario::new("count")
            .act("Get", vec![TypedValue::background(), TypedValue::int(1)])
            .assert(Assertion::query(
                "SELECT items",
                vec![ExpectedRow::new(vec![
                    TypedValue::int(1),
                    TypedValue::string("a"),
                ])],
            ));
        for statement in arrange {
            scenario = scenario.arrange(*statement);
        }
        scenario
    };

    let (mut db, service) = fixture();
    let runner = Runner::new(&service).unwrap();

    runner.run(&mut db, &scenario(&["INSERT 1 a"])).unwrap();

    let err = runner
        .run(&mut db, &scenario(&["INSERT 2 b"]))
        .unwrap_err();
    assert_eq!(err.to_string(), "count: more rows expected");
    assert_eq!(err.failure_kind(), Some(FailureKind::ExtraRows));
}

// ========== TEST: act_errors ==========
#[test]
fn test_act_errors() {
    let (mut db, service) = fixture();
    let runner = Runner::new(&service).unwrap();

    let missing = Scenario::new("missing").act("Delete", vec![]);
    let err = runner.run(&mut db, &missing).unwrap_err();
    assert!(matches!(err, RunError::MethodNotFound(ref m) if m == "Delete"));
    assert_eq!(err.to_string(), "method 'Delete' not found in service");

    let arity = Scenario::new("arity").act("Get", vec![TypedValue::int(1)]);
    let err = runner.run(&mut db, &arity).unwrap_err();
    assert!(matches!(
        err,
        RunError::ArityMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));

    let unknown = Scenario::new("unknown").act(
        "Put",
        vec![
            TypedValue::background(),
            TypedValue::new("shop.Order", serde_json::json!({})),
        ],
    );
    let err = runner.run(&mut db, &unknown).unwrap_err();
    assert!(matches!(err, RunError::UnknownType(ref t) if t == "shop.Order"));

    let wrong = Scenario::new("wrong").act(
        "Get",
        vec![TypedValue::background(), TypedValue::string("1")],
    );
    let err = runner.run(&mut db, &wrong).unwrap_err();
    assert!(matches!(err, RunError::Invoke(_)));
}

// ========== TEST: arrange_failure ==========
#[test]
fn test_arrange_failure() {
    let (db, result) = run(r#"
tests:
  - name: bad setup
    arrange:
      - statement: DROP EVERYTHING
      - statement: INSERT 1 a
    act:
      method: Get
      arguments:
        - { type: context, value: background }
        - { type: int, value: 1 }
"#);
    let err = result.unwrap_err();
    assert!(matches!(err, RunError::Arrange { ref statement, .. } if statement == "DROP EVERYTHING"));
    assert_eq!(db.executed, vec!["DROP EVERYTHING"]);
}

// ========== TEST: fail_fast ==========
#[test]
fn test_fail_fast() {
    let (db, result) = run(r#"
tests:
  - name: first
    arrange:
      - statement: INSERT 1 a
    act:
      method: Get
      arguments:
        - { type: context, value: background }
        - { type: int, value: 1 }
    assert:
      - error: boom
  - name: second
    arrange:
      - statement: INSERT 2 b
    act:
      method: Get
      arguments:
        - { type: context, value: background }
        - { type: int, value: 2 }
"#);
    let failure = result.unwrap_err();
    assert_eq!(failure.to_string(), "first: expected error");
    assert_eq!(db.executed, vec!["INSERT 1 a"]);
}

// ========== TEST: suite_from_files ==========
#[test]
fn test_suite_from_files() {
    let (mut db, service) = fixture();

    Suite::new()
        .file("tests/scenarios/items.yaml")
        .file("tests/scenarios/missing.json")
        .register_type::<Item>()
        .run(&mut db, &service)
        .unwrap();

    assert_eq!(db.executed, vec!["CLEAR", "CLEAR"]);
}
