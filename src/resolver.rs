//! Entry point bundling the three collaborators of a request.

use crate::analysis::{self, PathOutcome, PathResolver, ValidationError};
use crate::compute::{Geometry, GeometryProvider, TransformPipeline};
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::store::{ConfigId, Edge, GraphStore, ParamMap, ParameterStore, PlatformConfig, ReferentialId, TransfoId, TransfoTree};
use tracing::debug;

/// Answers graph, parameter and transform queries against one snapshot.
///
/// The resolver holds no state of its own; it borrows the stores for the
/// duration of the request.
pub struct Resolver<'a> {
    graph: &'a dyn GraphStore,
    params: &'a dyn ParameterStore,
    provider: &'a dyn GeometryProvider,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(graph: &'a dyn GraphStore, params: &'a dyn ParameterStore, provider: &'a dyn GeometryProvider) -> Self {
        Self::with_config(graph, params, provider, ResolverConfig::default())
    }

    pub fn with_config(
        graph: &'a dyn GraphStore,
        params: &'a dyn ParameterStore,
        provider: &'a dyn GeometryProvider,
        config: ResolverConfig,
    ) -> Self {
        Self { graph, params, provider, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn is_connected(&self, edges: &[Edge], allow_parallel: bool) -> bool {
        analysis::is_connected(edges, allow_parallel)
    }

    pub fn is_tree(&self, edges: &[Edge]) -> bool {
        analysis::is_tree(edges)
    }

    pub fn find_path(
        &self,
        config: ConfigId,
        from: ReferentialId,
        to: ReferentialId,
        stop_at: Option<&str>,
    ) -> Result<PathOutcome> {
        PathResolver::new(self.graph).find_path(config, from, to, stop_at)
    }

    pub fn resolve_params(&self, transfo: TransfoId, time: Option<f64>) -> Result<Option<ParamMap>> {
        self.pipeline().resolve_params(transfo, time)
    }

    pub fn apply(&self, value: Geometry, transfos: &[TransfoId], time: Option<f64>) -> Result<Option<Geometry>> {
        self.pipeline().apply(value, transfos, time)
    }

    /// Moves `value` from referential `from` to referential `to` using the
    /// transfos of `config`. `Ok(None)` when `to` is unreachable.
    pub fn transform(
        &self,
        config: ConfigId,
        from: ReferentialId,
        to: ReferentialId,
        value: Geometry,
        time: Option<f64>,
    ) -> Result<Option<Geometry>> {
        let chain = PathResolver::new(self.graph).transfo_chain(config, from, to)?;
        if chain.is_empty() && from != to {
            return Ok(None);
        }
        debug!(from = %from, to = %to, steps = chain.len(), "transform along path");
        self.apply(value, &chain, time)
    }

    pub fn validate_tree(&self, tree: &TransfoTree) -> std::result::Result<(), Vec<ValidationError>> {
        analysis::validate_transfo_tree(self.graph, tree)
    }

    pub fn validate_config(&self, config: &PlatformConfig) -> std::result::Result<(), Vec<ValidationError>> {
        analysis::validate_platform_config(self.graph, config, self.config.parallel_edges)
    }

    fn pipeline(&self) -> TransformPipeline<'a> {
        TransformPipeline::new(self.graph, self.params, self.provider).with_time_param(&self.config.time_param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{FunctionRegistry, Point};
    use crate::config::ParallelEdgePolicy;
    use crate::error::ResolveError;
    use crate::store::fixtures::{pose_store, reference_snapshot};
    use crate::store::{ParamValue, TreeId};
    use smallvec::smallvec;

    fn origin() -> Geometry {
        Geometry::Point(Point::default())
    }

    #[test]
    fn test_graph_queries() {
        let (snapshot, store, registry) = (reference_snapshot(), pose_store(), FunctionRegistry::builtin());
        let resolver = Resolver::new(&snapshot, &store, &registry);

        let edges = snapshot.config_edges(ConfigId(1)).unwrap();
        assert!(resolver.is_connected(&edges, false));
        assert!(resolver.is_tree(&edges));

        let outcome = resolver.find_path(ConfigId(1), ReferentialId(1), ReferentialId(7), None).unwrap();
        assert_eq!(outcome, PathOutcome::Transfos(vec![TransfoId(1), TransfoId(4), TransfoId(5), TransfoId(6)]));
    }

    #[test]
    fn test_resolve_params_by_id() {
        let (snapshot, store, registry) = (reference_snapshot(), pose_store(), FunctionRegistry::builtin());
        let resolver = Resolver::new(&snapshot, &store, &registry);

        let params = resolver.resolve_params(TransfoId(20), Some(5.0)).unwrap().unwrap();
        assert_eq!(params["vec3"], ParamValue::List(smallvec![5.0, 10.0, 1.0]));
        assert_eq!(resolver.resolve_params(TransfoId(20), Some(15.0)).unwrap(), None);
        assert_eq!(resolver.resolve_params(TransfoId(99), None).unwrap_err(), ResolveError::TransfoNotFound(TransfoId(99)));
    }

    #[test]
    fn test_transform_between_referentials() {
        let (snapshot, store, registry) = (reference_snapshot(), pose_store(), FunctionRegistry::builtin());
        let resolver = Resolver::new(&snapshot, &store, &registry);

        let out = resolver.transform(ConfigId(1), ReferentialId(1), ReferentialId(7), origin(), None).unwrap();
        assert_eq!(out, Some(Geometry::Point(Point::new(16.0, 0.0, 0.0))));

        let same = resolver.transform(ConfigId(1), ReferentialId(3), ReferentialId(3), origin(), None).unwrap();
        assert_eq!(same, Some(origin()));

        let unreachable = resolver.transform(ConfigId(1), ReferentialId(3), ReferentialId(8), origin(), None).unwrap();
        assert_eq!(unreachable, None);
    }

    #[test]
    fn test_validation_follows_configured_policy() {
        let (snapshot, store, registry) = (reference_snapshot(), pose_store(), FunctionRegistry::builtin());
        let mut config = snapshot.config(ConfigId(3)).unwrap().clone();
        config.allow_parallel_edges = false;

        let permissive = ResolverConfig { parallel_edges: ParallelEdgePolicy::Permissive, ..Default::default() };
        assert!(Resolver::with_config(&snapshot, &store, &registry, permissive).validate_config(&config).is_ok());
        assert!(Resolver::new(&snapshot, &store, &registry).validate_config(&config).is_err());

        let tree = snapshot.tree(TreeId(1)).unwrap().clone();
        assert!(Resolver::new(&snapshot, &store, &registry).validate_tree(&tree).is_ok());
    }
}
