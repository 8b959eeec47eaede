//! Application wiring: store, price source, ledger, API.

use crate::config::AppConfig;
use crate::error::AppResult;
use coinhub_api::ApiState;
use coinhub_core::{Account, CoinSymbol, ListedCoin, Money, RatePlan, Role};
use coinhub_feed::{FixtureData, KlineClient, LiveFeed, PriceSource, ProviderKind};
use coinhub_store::MemoryStore;
use std::sync::Arc;
use tracing::{info, warn};

/// The assembled application.
pub struct Application {
    config: AppConfig,
    state: ApiState,
}

impl Application {
    /// Build the application from configuration and apply seed data.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store = Arc::new(MemoryStore::new());

        let source: Arc<dyn PriceSource> = match config.price.provider {
            ProviderKind::LiveFeed => {
                let client = KlineClient::new(config.price.kline_url.clone())?;
                Arc::new(LiveFeed::new(client))
            }
            ProviderKind::FixtureData => Arc::new(FixtureData::default()),
        };
        info!(provider = ?config.price.provider, "Price source ready");

        seed(&store, &config);

        let state = ApiState::new(store, source);
        Ok(Self { config, state })
    }

    /// Serve the API until shutdown.
    pub async fn run(self) -> AppResult<()> {
        coinhub_api::serve(self.config.listen_addr, self.state).await?;
        Ok(())
    }
}

/// Apply configured seed data. Individual failures (e.g. re-seeding an
/// email that exists) are logged and skipped, not fatal.
fn seed(store: &MemoryStore, config: &AppConfig) {
    if let Some(admin) = &config.seed.admin {
        match store.insert_account(Account::new(
            &admin.email,
            &admin.display_name,
            Role::Admin,
        )) {
            Ok(account) => info!(id = %account.id, email = %account.email, "Seeded admin account"),
            Err(e) => warn!(error = %e, "Skipping admin seed"),
        }
    }

    for coin in &config.seed.coins {
        let mut listing = ListedCoin::new(CoinSymbol::new(&coin.symbol), &coin.feed_symbol, &coin.name);
        listing.description = coin.description.clone();
        match store.insert_coin(listing) {
            Ok(created) => info!(symbol = %created.symbol, "Seeded coin listing"),
            Err(e) => warn!(symbol = %coin.symbol, error = %e, "Skipping coin seed"),
        }
    }

    for plan in &config.seed.rate_plans {
        let created = store.insert_plan(RatePlan::new(
            &plan.name,
            plan.term_months,
            plan.annual_rate,
            Money::new(plan.min_amount),
        ));
        info!(name = %created.name, "Seeded rate plan");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SeedCoin, SeedRatePlan};
    use rust_decimal_macros::dec;

    #[test]
    fn test_seed_is_idempotent_per_unique_keys() {
        let store = MemoryStore::new();
        let mut config = AppConfig::default();
        config.seed.coins.push(SeedCoin {
            symbol: "BTCC".into(),
            feed_symbol: "BTCUSDT".into(),
            name: "Coinhub Bitcoin".into(),
            description: None,
        });
        config.seed.rate_plans.push(SeedRatePlan {
            name: "6M Fixed".into(),
            term_months: 6,
            annual_rate: dec!(0.045),
            min_amount: dec!(1000),
        });

        seed(&store, &config);
        // Re-seeding the same coin symbol is skipped, not fatal.
        seed(&store, &config);

        assert_eq!(store.active_coins().len(), 1);
    }

    #[test]
    fn test_application_builds_with_defaults() {
        let app = Application::new(AppConfig::default()).unwrap();
        assert_eq!(app.config.listen_addr.port(), 8080);
    }
}
