// Dashboard store - Owns the four dataset slots and their refresh lifecycle
use crate::application::data_source::DashboardDataSource;
use crate::application::dataset_slot::{DatasetSlot, StalePolicy};
use crate::application::refresh_scheduler::RefreshScheduler;
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::inventory::InventoryData;
use crate::domain::market::MarketTrend;
use crate::domain::sales::SalesData;
use crate::domain::selector::{DEFAULT_TRENDS_QUERY, Platform, Timeframe, Warehouse};
use crate::domain::social::SocialMetrics;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub refresh_interval: Duration,
    pub stale_policy: StalePolicy,
    pub timeframe: Timeframe,
    pub warehouse: Warehouse,
    pub trends_query: String,
    pub platform: Platform,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            stale_policy: StalePolicy::default(),
            timeframe: Timeframe::default(),
            warehouse: Warehouse::default(),
            trends_query: DEFAULT_TRENDS_QUERY.to_string(),
            platform: Platform::default(),
        }
    }
}

pub struct DashboardStore {
    sales: DatasetSlot<Timeframe, SalesData>,
    inventory: DatasetSlot<Warehouse, InventoryData>,
    market_trends: DatasetSlot<String, MarketTrend>,
    social_metrics: DatasetSlot<Platform, SocialMetrics>,
    last_refresh: Arc<watch::Sender<Option<DateTime<Utc>>>>,
    revision: Arc<watch::Sender<u64>>,
    refresh_interval: Duration,
    scheduler: Mutex<Option<RefreshScheduler>>,
}

impl DashboardStore {
    pub fn new(source: Arc<dyn DashboardDataSource>, settings: StoreSettings) -> Self {
        let revision = Arc::new(watch::channel(0u64).0);
        let policy = settings.stale_policy;

        let src = source.clone();
        let sales = DatasetSlot::new("sales", settings.timeframe, policy, revision.clone(), move |timeframe: Timeframe| {
            let src = src.clone();
            async move { src.fetch_sales(timeframe).await }
        });

        let src = source.clone();
        let inventory = DatasetSlot::new("inventory", settings.warehouse, policy, revision.clone(), move |warehouse: Warehouse| {
            let src = src.clone();
            async move { src.fetch_inventory(warehouse).await }
        });

        let src = source.clone();
        let market_trends = DatasetSlot::new(
            "market_trends",
            settings.trends_query,
            policy,
            revision.clone(),
            move |query: String| {
                let src = src.clone();
                async move { src.fetch_market_trends(&query).await }
            },
        );

        let src = source;
        let social_metrics = DatasetSlot::new("social_metrics", settings.platform, policy, revision.clone(), move |platform: Platform| {
            let src = src.clone();
            async move { src.fetch_social_metrics(platform).await }
        });

        Self {
            sales,
            inventory,
            market_trends,
            social_metrics,
            last_refresh: Arc::new(watch::channel(None).0),
            revision,
            refresh_interval: settings.refresh_interval,
            scheduler: Mutex::new(None),
        }
    }

    /// Kick off the first refresh and install the periodic timer.
    ///
    /// Returns the handle of the initial refresh, or `None` when the store is
    /// already running.
    pub fn init(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut scheduler = self.scheduler.lock().unwrap_or_else(PoisonError::into_inner);
        if scheduler.is_some() {
            tracing::warn!("Dashboard store already initialised");
            return None;
        }

        let initial = tokio::spawn(self.refresh_all());

        // Weak so the timer task does not keep the store alive
        let store = Arc::downgrade(self);
        *scheduler = Some(RefreshScheduler::start(self.refresh_interval, move || {
            match store.upgrade() {
                Some(store) => store.refresh_all(),
                None => futures::future::ready(()).boxed(),
            }
        }));

        tracing::info!("Dashboard store initialised");
        Some(initial)
    }

    /// Stop the periodic timer. In-flight loads are left to settle.
    pub async fn dispose(&self) {
        let scheduler = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(scheduler) = scheduler {
            scheduler.stop().await;
            tracing::info!("Dashboard store disposed");
        }
    }

    /// Reload all four slots concurrently with their current selectors, then
    /// stamp `last_refresh` once every load has settled.
    pub fn refresh_all(&self) -> BoxFuture<'static, ()> {
        let sales = self.sales.begin_load(None);
        let inventory = self.inventory.begin_load(None);
        let market_trends = self.market_trends.begin_load(None);
        let social_metrics = self.social_metrics.begin_load(None);

        let last_refresh = self.last_refresh.clone();
        let revision = self.revision.clone();

        async move {
            futures::join!(sales, inventory, market_trends, social_metrics);

            let now = Utc::now();
            last_refresh.send_replace(Some(now));
            revision.send_modify(|r| *r += 1);
            tracing::info!("Dashboard data refreshed at {}", now.to_rfc3339());
        }
        .boxed()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn subscribe_last_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_refresh.subscribe()
    }

    /// Change counter bumped on every slot or refresh update.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            sales: self.sales.snapshot(),
            inventory: self.inventory.snapshot(),
            market_trends: self.market_trends.snapshot(),
            social_metrics: self.social_metrics.snapshot(),
            last_refresh: self.last_refresh(),
        }
    }

    pub fn sales(&self) -> &DatasetSlot<Timeframe, SalesData> {
        &self.sales
    }

    pub fn inventory(&self) -> &DatasetSlot<Warehouse, InventoryData> {
        &self.inventory
    }

    pub fn market_trends(&self) -> &DatasetSlot<String, MarketTrend> {
        &self.market_trends
    }

    pub fn social_metrics(&self) -> &DatasetSlot<Platform, SocialMetrics> {
        &self.social_metrics
    }

    pub fn set_sales_timeframe(&self, timeframe: Timeframe) -> Option<JoinHandle<()>> {
        self.sales.set_selector(timeframe)
    }

    pub fn set_inventory_warehouse(&self, warehouse: Warehouse) -> Option<JoinHandle<()>> {
        self.inventory.set_selector(warehouse)
    }

    pub fn set_trends_query(&self, query: String) -> Option<JoinHandle<()>> {
        self.market_trends.set_selector(query)
    }

    pub fn set_social_platform(&self, platform: Platform) -> Option<JoinHandle<()>> {
        self.social_metrics.set_selector(platform)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSource;
    use super::*;
    use crate::domain::inventory::WarehouseView;

    fn store_with(source: Arc<RecordingSource>, stale_policy: StalePolicy) -> Arc<DashboardStore> {
        let settings = StoreSettings {
            stale_policy,
            ..StoreSettings::default()
        };
        Arc::new(DashboardStore::new(source, settings))
    }

    fn sorted(mut calls: Vec<String>) -> Vec<String> {
        calls.sort();
        calls
    }

    #[tokio::test]
    async fn test_refresh_all_loads_every_slot_then_stamps() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);

        let refresh = store.refresh_all();
        assert!(store.snapshot().any_loading());
        refresh.await;

        let snapshot = store.snapshot();
        assert!(!snapshot.any_loading());
        assert!(snapshot.sales.data.is_some());
        assert!(snapshot.inventory.data.is_some());
        assert!(snapshot.market_trends.data.is_some());
        assert!(snapshot.social_metrics.data.is_some());
        assert!(snapshot.last_refresh.is_some());
        assert_eq!(
            sorted(source.calls()),
            vec![
                "inventory:all",
                "sales:daily",
                "social:all",
                "trends:fragrance industry",
            ]
        );
    }

    #[tokio::test]
    async fn test_last_refresh_waits_for_slowest_load() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);
        let release = source.hold_inventory(Warehouse::All);

        let refresh = tokio::spawn(store.refresh_all());
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        assert!(store.sales().data().is_some());
        assert!(store.inventory().is_loading());
        assert!(store.last_refresh().is_none());

        release.send(()).unwrap();
        refresh.await.unwrap();

        assert!(!store.inventory().is_loading());
        assert!(store.last_refresh().is_some());
    }

    #[tokio::test]
    async fn test_failed_slot_does_not_block_refresh() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);
        store.refresh_all().await;
        let before = store.social_metrics().data();
        let first_refresh = store.last_refresh();

        source.fail_social(true);
        store.refresh_all().await;

        assert!(!store.social_metrics().is_loading());
        assert_eq!(store.social_metrics().data(), before);
        assert!(store.last_refresh() >= first_refresh);
        assert!(store.last_refresh().is_some());
    }

    #[tokio::test]
    async fn test_selector_change_reloads_only_that_slot() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);

        let handle = store.set_social_platform(Platform::Tiktok).unwrap();
        handle.await.unwrap();

        assert_eq!(source.calls(), vec!["social:tiktok"]);
        assert!(store.sales().data().is_none());
        assert!(matches!(
            store.social_metrics().data().as_deref(),
            Some(SocialMetrics::Single(metrics)) if metrics.platform == "TikTok"
        ));
    }

    #[tokio::test]
    async fn test_stale_inventory_result_discarded_by_default() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);
        let release_all = source.hold_inventory(Warehouse::All);

        let first = store.inventory().load(None);
        let second = store.set_inventory_warehouse(Warehouse::Dubai).unwrap();
        second.await.unwrap();

        release_all.send(()).unwrap();
        first.await.unwrap();

        let data = store.inventory().data().unwrap();
        assert!(matches!(data.warehouse_data, WarehouseView::Single(_)));
    }

    #[tokio::test]
    async fn test_fire_and_forget_loads_settle_without_their_handles() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);

        let _ = store.sales().load(None);
        let older = store.inventory().load(None);
        let _ = store.inventory().load(None);
        older.await.unwrap();

        let mut sales = store.sales().subscribe();
        sales.wait_for(|s| !s.loading).await.unwrap();
        let mut inventory = store.inventory().subscribe();
        inventory.wait_for(|s| !s.loading).await.unwrap();

        assert!(store.sales().data().is_some());
        assert!(store.inventory().data().is_some());
        assert_eq!(
            sorted(source.calls()),
            vec!["inventory:all", "inventory:all", "sales:daily"]
        );
    }

    #[tokio::test]
    async fn test_stale_inventory_result_applied_under_apply_policy() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Apply);
        let release_all = source.hold_inventory(Warehouse::All);

        let first = store.inventory().load(None);
        let second = store.set_inventory_warehouse(Warehouse::Dubai).unwrap();
        second.await.unwrap();

        release_all.send(()).unwrap();
        first.await.unwrap();

        let data = store.inventory().data().unwrap();
        assert!(matches!(data.warehouse_data, WarehouseView::All(_)));
        assert_eq!(store.inventory().selector(), Warehouse::Dubai);
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_refreshes_immediately() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);

        let initial = store.init().expect("first init");
        assert!(store.snapshot().any_loading());
        initial.await.unwrap();

        assert_eq!(source.calls().len(), 4);
        assert!(store.last_refresh().is_some());
        assert!(store.init().is_none());

        store.dispose().await;
        assert!(store.init().is_some());
        store.dispose().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_reloads_with_current_selectors() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);
        let started = tokio::time::Instant::now();

        store.init().unwrap().await.unwrap();
        store.set_inventory_warehouse(Warehouse::Dubai).unwrap().await.unwrap();
        store.set_sales_timeframe(Timeframe::Monthly).unwrap().await.unwrap();
        source.clear_calls();

        let mut refreshed = store.subscribe_last_refresh();
        refreshed.mark_unchanged();
        refreshed.changed().await.unwrap();

        assert!(started.elapsed() >= DEFAULT_REFRESH_INTERVAL);
        assert_eq!(
            sorted(source.calls()),
            vec![
                "inventory:dubai",
                "sales:monthly",
                "social:all",
                "trends:fragrance industry",
            ]
        );

        store.dispose().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_stops_timer() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source.clone(), StalePolicy::Discard);

        store.init().unwrap().await.unwrap();
        store.dispose().await;
        source.clear_calls();

        tokio::time::sleep(DEFAULT_REFRESH_INTERVAL * 3).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_revision_advances_on_changes() {
        let source = Arc::new(RecordingSource::new());
        let store = store_with(source, StalePolicy::Discard);
        let mut changes = store.subscribe();
        changes.mark_unchanged();

        store.refresh_all().await;

        assert!(changes.has_changed().unwrap());
        assert!(*changes.borrow_and_update() >= 9);
    }
}
