//! Per-service composition of paths and definitions.
//!
//! A fragment only contains path items with at least one operation, and every
//! `$ref` in it points at a definition of the same fragment.

use crate::definition_generator::DefinitionGenerator;
use crate::description::Service;
use crate::model_generator::ModelGenerator;
use crate::path_generator::PathGenerator;
use crate::swagger_builder::{ServiceFragment, Tag};
use log::debug;

/// Turns one service into its `{tags, paths, definitions}` fragment.
///
/// Paths are generated first so that any HAL+JSON wrapper their responses refer to
/// lands in the same fragment's definitions.
pub struct ServiceTransformer<'a> {
    service: &'a Service,
    model_generator: &'a ModelGenerator,
}

impl<'a> ServiceTransformer<'a> {
    /// Create a transformer for the given service
    pub fn new(service: &'a Service, model_generator: &'a ModelGenerator) -> Self {
        Self {
            service,
            model_generator,
        }
    }

    /// Build the service fragment
    pub fn to_fragment(&self) -> ServiceFragment {
        debug!("Transforming service: {}", self.service.name);

        let definitions = DefinitionGenerator::new(self.service, self.model_generator);
        let generated = PathGenerator::new(self.service, self.model_generator, &definitions).generate();

        let paths = generated
            .paths
            .into_iter()
            .filter(|(_, item)| !item.is_empty())
            .collect();

        ServiceFragment {
            tags: vec![self.tag()],
            paths,
            definitions: definitions.definitions(generated.hal_collections),
        }
    }

    fn tag(&self) -> Tag {
        Tag {
            name: self.service.name.clone(),
            description: self.service.description.clone().filter(|d| !d.is_empty()),
        }
    }
}
