// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::Plasm;
use crate::module::{Module, ModulePtr};
use crate::processors::{
    AccumulateProcessor, AddProcessor, ConstantProcessor, ModuleFactory, MultiplyProcessor,
    PrinterProcessor,
};
use crate::tendrils::{TendrilKind, Tendrils};

/// End-to-end runs over the built-in processors
#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> ModulePtr {
        let module = Module::new::<ConstantProcessor>().unwrap();
        module.parameters().set("value", value).unwrap();
        module
    }

    #[test]
    fn arithmetic_pipeline() {
        let two = constant(2.0);
        let three = constant(3.0);
        let add = Module::new::<AddProcessor>().unwrap();
        let scale = Module::new::<MultiplyProcessor>().unwrap();
        scale.parameters().set("factor", 10.0).unwrap();
        let print = Module::new::<PrinterProcessor>().unwrap();

        let mut plasm = Plasm::new();
        plasm.connect(&two, "out", &add, "left").unwrap();
        plasm.connect(&three, "out", &add, "right").unwrap();
        plasm.connect(&add, "sum", &scale, "left").unwrap();
        plasm.connect(&scale, "product", &print, "in").unwrap();

        let summary = plasm.go(print.id()).unwrap();

        assert_eq!(summary.executed.len(), 5);
        assert_eq!(summary.levels, 4);
        assert_eq!(*summary.executed.last().unwrap(), print.id());
        assert_eq!(print.outputs().get::<String>("line").unwrap(), "50");
    }

    #[test]
    fn parameter_change_reruns_only_downstream() {
        let source = constant(1.0);
        let acc = Module::new::<AccumulateProcessor>().unwrap();
        let mut plasm = Plasm::new();
        plasm.connect(&source, "out", &acc, "in").unwrap();

        plasm.go_all().unwrap();
        assert_eq!(acc.outputs().get::<f64>("total").unwrap(), 1.0);

        // nothing dirty: a second run is a no-op
        let summary = plasm.go_all().unwrap();
        assert!(summary.executed.is_empty());
        assert_eq!(acc.outputs().get::<f64>("total").unwrap(), 1.0);

        source.parameters().set("value", 4.0).unwrap();
        plasm.mark_dirty(source.id()).unwrap();
        let summary = plasm.go_all().unwrap();
        assert_eq!(summary.executed, vec![source.id(), acc.id()]);
        assert_eq!(acc.outputs().get::<f64>("total").unwrap(), 5.0);
    }

    #[test]
    fn factory_built_modules_connect_by_name() {
        let factory = ModuleFactory::default();
        let a = factory.create("constant", "a").unwrap().unwrap();
        let m = factory.create("multiply", "m").unwrap().unwrap();
        a.parameters().at("value").unwrap().set_json(serde_json::json!(6)).unwrap();
        m.parameters().at("factor").unwrap().set_json(serde_json::json!(0.5)).unwrap();

        let mut plasm = Plasm::new();
        plasm.connect(&a, "out", &m, "left").unwrap();
        plasm.go(m.id()).unwrap();

        assert_eq!(m.outputs().get::<f64>("product").unwrap(), 3.0);
        assert!(plasm.viz_string().contains("out -> left"));
    }

    #[test]
    fn outputs_serialize_after_execution() {
        let source = constant(2.5);
        let print = Module::new::<PrinterProcessor>().unwrap();
        let mut plasm = Plasm::new();
        plasm.connect(&source, "out", &print, "in").unwrap();
        plasm.go_all().unwrap();

        let json = serde_json::to_value(print.inputs()).unwrap();
        assert_eq!(json["in"]["type"], "f64");
        assert_eq!(json["in"]["value"], 2.5);

        let restored: Tendrils = serde_json::from_value(json).unwrap();
        assert_eq!(restored.kind(), TendrilKind::Parameter);
        assert_eq!(restored.get::<f64>("in").unwrap(), 2.5);
    }
}
