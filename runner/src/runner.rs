//! Scenario runner.

use dbtest_construct::{convert, Constructor};
use dbtest_core::{Service, Value, ValueType};
use dbtest_registry::{RegistryBuilder, TypeRegistry};
use tracing::{debug, debug_span, info, warn};

use crate::assertion::Verifier;
use crate::error::{RunError, RunResult};
use crate::{Database, Scenario, TestSet};

/// Runs scenarios against a service.
///
/// The runner owns the type registry: it is built once, by discovery from
/// the service plus any explicit registrations, and is read-only afterwards.
pub struct Runner<'s> {
    service: &'s dyn Service,
    registry: TypeRegistry,
}

impl<'s> Runner<'s> {
    /// Create a runner, registering every record type the service's methods
    /// use.
    pub fn new(service: &'s dyn Service) -> RunResult<Self> {
        Self::with_registry(service, RegistryBuilder::new())
    }

    /// Create a runner on top of types already registered in `builder`.
    pub fn with_registry(service: &'s dyn Service, mut builder: RegistryBuilder) -> RunResult<Self> {
        builder.discover_from_service(service)?;
        Ok(Self {
            service,
            registry: builder.build(),
        })
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Run every scenario in order, stopping at the first failure.
    pub fn run_set(&self, db: &mut dyn Database, set: &TestSet) -> RunResult<()> {
        for scenario in &set.tests {
            self.run(db, scenario)?;
        }
        Ok(())
    }

    /// Run one scenario.
    pub fn run(&self, db: &mut dyn Database, scenario: &Scenario) -> RunResult<()> {
        let span = debug_span!("scenario", scenario = %scenario.name);
        let _enter = span.enter();

        let result = self.execute(db, scenario);
        match &result {
            Ok(()) => info!(scenario = %scenario.name, "scenario passed"),
            Err(err) => warn!(scenario = %scenario.name, error = %err, "scenario failed"),
        }
        result
    }

    fn execute(&self, db: &mut dyn Database, scenario: &Scenario) -> RunResult<()> {
        // 1. Arrange
        for statement in &scenario.arrange {
            debug!(statement = %statement.statement, "arrange");
            db.execute(&statement.statement)
                .map_err(|e| RunError::arrange(&statement.statement, e))?;
        }

        // 2. Act
        let act = &scenario.act;
        let method = self
            .service
            .resolve(&act.method)
            .ok_or_else(|| RunError::method_not_found(&act.method))?;
        let signature = method.signature();
        if act.arguments.len() != signature.arity() {
            return Err(RunError::arity_mismatch(
                &act.method,
                signature.arity(),
                act.arguments.len(),
            ));
        }

        let constructor = Constructor::new(&self.registry);
        let args: Vec<Value> = constructor
            .build_all(&act.arguments)?
            .into_iter()
            .zip(&signature.params)
            .map(|(value, param)| coerce_argument(value, &param.value_type()))
            .collect();

        debug!(method = %act.method, arguments = args.len(), "invoking method");
        let outcome = method.invoke(args)?;

        // 3. Assert
        let verifier = Verifier::new(&scenario.name, signature, &outcome, constructor);
        for (index, assertion) in scenario.assert.iter().enumerate() {
            debug!(index, kind = assertion.kind(), "checking assertion");
            verifier.verify(db, assertion)?;
        }
        Ok(())
    }
}

/// Convert an argument to its parameter type when a conversion applies.
/// Anything else is passed through and rejected by the method handle.
fn coerce_argument(value: Value, param: &ValueType) -> Value {
    if value.value_type().is_assignable_to(param) {
        return value;
    }
    convert(value.clone(), param).unwrap_or(value)
}

impl TestSet {
    /// Run every scenario against the service, stopping at the first
    /// failure. Record types are discovered from the service.
    pub fn run(&self, db: &mut dyn Database, service: &dyn Service) -> RunResult<()> {
        Runner::new(service)?.run_set(db, self)
    }
}
