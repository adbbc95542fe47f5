// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use crate::config::{load_and_validate_config, load_config, PipelineBuilder};
    use crate::errors::{ConfigError, ValidationError};

    /// The YAML demo pipeline loads, builds and computes (2 + 3) * 10
    #[test]
    fn test_arithmetic_pipeline_yaml() {
        let config = load_and_validate_config("configs/arithmetic.yaml").unwrap();
        assert_eq!(config.modules.len(), 5);
        assert_eq!(config.connections.len(), 4);
        assert_eq!(config.execution.start.as_deref(), Some("show"));

        let pipeline = PipelineBuilder::new().build(&config).unwrap();
        pipeline.run().unwrap();

        let scale = pipeline.module("scale").unwrap();
        assert_eq!(scale.outputs().get::<f64>("product").unwrap(), 50.0);
    }

    /// The TOML demo pipeline describes the same kind of graph in the other syntax
    #[test]
    fn test_running_total_toml() {
        let config = load_and_validate_config("configs/running-total.toml").unwrap();
        assert_eq!(config.execution.get_iterations(), 4);

        let pipeline = PipelineBuilder::new().build(&config).unwrap();
        let summaries = pipeline.run().unwrap();
        assert_eq!(summaries.len(), 4);

        let total = pipeline.module("total").unwrap();
        assert_eq!(total.outputs().get::<f64>("total").unwrap(), 102.0);
    }

    /// The broken demo file reports its cycle instead of building
    #[test]
    fn test_cyclic_pipeline_is_rejected() {
        let config = load_config("configs/cyclic.yaml").unwrap();
        match PipelineBuilder::new().build(&config) {
            Err(ConfigError::Invalid(errors)) => {
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ValidationError::CyclicConnection { .. })));
            }
            Err(other) => panic!("expected validation failure, got {other}"),
            Ok(_) => panic!("cyclic pipeline built"),
        }
        assert!(load_and_validate_config("configs/cyclic.yaml").is_err());
    }

    /// Every shipped pipeline at least parses
    #[test]
    fn test_all_configs_parse() {
        for entry in std::fs::read_dir("configs").unwrap() {
            let path = entry.unwrap().path();
            load_config(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        }
    }
}
