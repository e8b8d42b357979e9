use ballot_modules_api::{
    field_prefix, module_address, module_prefix, Address, CallResponse, Context, DefaultContext,
    MemStorage, Module, ModuleError, StateValue, WorkingSet,
};

/// A minimal module: stores one counter that only its admin may bump.
struct Counter {
    admin: StateValue<Address>,
    value: StateValue<u64>,
}

impl Default for Counter {
    fn default() -> Self {
        let prefix = module_prefix("tests", "Counter");
        Self {
            admin: StateValue::new(field_prefix(&prefix, "admin")),
            value: StateValue::new(field_prefix(&prefix, "value")),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum CounterError {
    #[error("not the admin")]
    NotAdmin,
}

impl Module for Counter {
    type Context = DefaultContext;
    type Config = Address;
    type CallMessage = u64;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<MemStorage>,
    ) -> Result<(), ModuleError> {
        self.admin.set(config, working_set);
        Ok(())
    }

    fn call(
        &self,
        message: u64,
        context: &DefaultContext,
        working_set: &mut WorkingSet<MemStorage>,
    ) -> Result<CallResponse, ModuleError> {
        let admin = self.admin.get_or_err(working_set).map_err(anyhow::Error::from)?;
        if &admin != context.sender() {
            return Err(anyhow::Error::from(CounterError::NotAdmin).into());
        }
        let value = self.value.get(working_set).unwrap_or_default();
        self.value.set(&(value + message), working_set);
        working_set.add_event("Counter: bump", &format!("{message}"));
        Ok(CallResponse::default())
    }
}

#[test]
fn test_module_call_and_typed_error() {
    let admin = Address::from([1; 32]);
    let module = Counter::default();
    let mut working_set = WorkingSet::new(MemStorage::new());

    module.genesis(&admin, &mut working_set).unwrap();
    module
        .call(5, &DefaultContext::new(admin), &mut working_set)
        .unwrap();
    assert_eq!(module.value.get(&working_set), Some(5));
    assert_eq!(working_set.events().len(), 1);

    let err = module
        .call(5, &DefaultContext::new(Address::from([2; 32])), &mut working_set)
        .unwrap_err();
    assert_eq!(err.downcast_ref::<CounterError>(), Some(&CounterError::NotAdmin));
}

#[test]
fn test_module_prefixes_do_not_collide() {
    let prefix = module_prefix("tests", "Counter");
    let admin = field_prefix(&prefix, "admin");

    assert_eq!(admin.to_string(), "\"tests/Counter/admin/\"");
    assert_ne!(admin, field_prefix(&prefix, "value"));
    assert_ne!(prefix, module_prefix("tests", "Other"));

    let a: Address = module_address("tests", "Counter");
    let b: Address = module_address("tests", "Other");
    assert_ne!(a, b);
}
