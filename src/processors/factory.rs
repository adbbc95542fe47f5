// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::errors::PlasmError;
use crate::module::{Module, ModulePtr};
use crate::traits::Processor;

use super::{
    AccumulateProcessor, AddProcessor, ConstantProcessor, MultiplyProcessor, PrinterProcessor,
};

type Constructor = Box<dyn Fn(&str) -> Result<ModulePtr, PlasmError> + Send + Sync>;

/// Name -> constructor registry used to build modules from pipeline descriptions.
///
/// `ModuleFactory::default()` knows the built-in processors; applications add
/// their own with [`ModuleFactory::register`].
///
/// ```
/// use plasmflow::processors::ModuleFactory;
///
/// let factory = ModuleFactory::default();
/// let module = factory.create("add", "adder").unwrap().unwrap();
/// assert_eq!(module.label(), "adder");
/// assert_eq!(module.inputs().names(), vec!["left", "right"]);
/// ```
pub struct ModuleFactory {
    constructors: BTreeMap<String, Constructor>,
}

impl ModuleFactory {
    /// A factory that knows no module types.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Make `P` available under `type_name`. A later registration under the
    /// same name replaces the earlier one.
    pub fn register<P: Processor + Default>(&mut self, type_name: &str) {
        self.register_with(type_name, |label| {
            Module::from_processor_with_label(P::default(), label)
        });
    }

    /// Register a custom constructor, for processors without a useful `Default`.
    pub fn register_with<F>(&mut self, type_name: &str, constructor: F)
    where
        F: Fn(&str) -> Result<ModulePtr, PlasmError> + Send + Sync + 'static,
    {
        self.constructors
            .insert(type_name.to_string(), Box::new(constructor));
    }

    /// Build a new module of `type_name` labelled `label`.
    ///
    /// Returns `None` for a type nobody registered.
    pub fn create(&self, type_name: &str, label: &str) -> Option<Result<ModulePtr, PlasmError>> {
        self.constructors
            .get(type_name)
            .map(|constructor| constructor(label))
    }

    pub fn is_available(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn available(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}

impl Default for ModuleFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        factory.register::<ConstantProcessor>("constant");
        factory.register::<AddProcessor>("add");
        factory.register::<MultiplyProcessor>("multiply");
        factory.register::<AccumulateProcessor>("accumulate");
        factory.register::<PrinterProcessor>("printer");
        factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::stub::RecordingProcessor;

    #[test]
    fn builtins_are_available() {
        let factory = ModuleFactory::default();
        assert_eq!(
            factory.available(),
            vec!["accumulate", "add", "constant", "multiply", "printer"]
        );
        for name in factory.available() {
            let module = factory.create(name, "m").unwrap().unwrap();
            assert_eq!(module.type_name(), name);
        }
    }

    #[test]
    fn unknown_type_is_none() {
        let factory = ModuleFactory::default();
        assert!(factory.create("divide", "d").is_none());
        assert!(!factory.is_available("divide"));
    }

    #[test]
    fn each_create_builds_a_fresh_module() {
        let factory = ModuleFactory::default();
        let a = factory.create("constant", "a").unwrap().unwrap();
        let b = factory.create("constant", "b").unwrap().unwrap();
        assert_ne!(a.id(), b.id());

        a.parameters().set("value", 1.0).unwrap();
        assert_eq!(b.parameters().get::<f64>("value").unwrap(), 0.0);
    }

    #[test]
    fn custom_registration() {
        let mut factory = ModuleFactory::empty();
        factory.register::<RecordingProcessor>("recorder");
        assert_eq!(factory.available(), vec!["recorder"]);
        let module = factory.create("recorder", "r1").unwrap().unwrap();
        assert_eq!(module.label(), "r1");
    }
}
