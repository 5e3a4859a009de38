use std::sync::Arc;
use tracing::{debug, instrument};

use crate::errors::ServiceError;
use crate::repositories::LocationRepository;
use crate::services::EvaluationContext;

/// Resolves the default (fallback) location for a stock: the enabled
/// location with the lowest priority value. Ties break on location code
/// ascending, so resolution is deterministic regardless of storage
/// iteration order.
#[derive(Clone)]
pub struct DefaultLocationResolver {
    locations: Arc<dyn LocationRepository>,
}

impl DefaultLocationResolver {
    pub fn new(locations: Arc<dyn LocationRepository>) -> Self {
        Self { locations }
    }

    /// Memoized per evaluation run via the context; a second call for
    /// the same stock within one run returns the cached code without
    /// touching storage.
    #[instrument(skip(self, ctx))]
    pub async fn resolve(
        &self,
        stock_id: i64,
        ctx: &mut EvaluationContext,
    ) -> Result<String, ServiceError> {
        if let Some(code) = ctx.cached_default_location(stock_id) {
            return Ok(code.to_string());
        }

        ctx.check_deadline()?;
        let candidates = self.locations.list_enabled_for_stock(stock_id).await?;
        let chosen = candidates
            .into_iter()
            .next()
            .ok_or(ServiceError::NoDefaultLocation(stock_id))?;

        debug!(
            stock_id,
            location_code = %chosen.location_code,
            priority = chosen.priority,
            "Resolved default location"
        );
        ctx.cache_default_location(stock_id, chosen.location_code.clone());
        Ok(chosen.location_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::location_repository::MockLocationRepository;
    use crate::repositories::StockLocation;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn picks_first_candidate_and_memoizes() {
        let mut repo = MockLocationRepository::new();
        repo.expect_list_enabled_for_stock()
            .times(1)
            .returning(|_| {
                Ok(vec![
                    StockLocation {
                        location_code: "central".into(),
                        priority: 1,
                    },
                    StockLocation {
                        location_code: "east".into(),
                        priority: 2,
                    },
                ])
            });

        let resolver = DefaultLocationResolver::new(Arc::new(repo));
        let mut ctx = EvaluationContext::new();

        let first = resolver.resolve(7, &mut ctx).await.unwrap();
        let second = resolver.resolve(7, &mut ctx).await.unwrap();
        assert_eq!(first, "central");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn no_candidates_is_fatal() {
        let mut repo = MockLocationRepository::new();
        repo.expect_list_enabled_for_stock()
            .returning(|_| Ok(vec![]));

        let resolver = DefaultLocationResolver::new(Arc::new(repo));
        let mut ctx = EvaluationContext::new();

        let err = resolver.resolve(7, &mut ctx).await.unwrap_err();
        assert_matches!(err, ServiceError::NoDefaultLocation(7));
    }
}
