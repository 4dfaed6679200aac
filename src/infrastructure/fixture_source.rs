// Fixture data source - deterministic payloads with simulated latency
use crate::application::assistant::DashboardAssistant;
use crate::application::data_source::DashboardDataSource;
use crate::domain::assistant::{
    CommandIntent, CommandReply, Direction, Forecast, ForecastFactor, ForecastMetric, Impact,
};
use crate::domain::inventory::{InventoryData, ProductStock, StockLevel, WarehouseMetrics, WarehouseView};
use crate::domain::market::MarketTrend;
use crate::domain::sales::{ChartSeries, SalesData};
use crate::domain::selector::{Platform, Timeframe, Warehouse};
use crate::domain::social::{
    ContentItem, Demographics, LocationShare, PlatformMetrics, SocialMetrics, SocialSummary,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;

const PRODUCTS: [&str; 5] = ["Duality", "Moon Dust", "Momento", "Dahab", "Coda"];

#[derive(Debug, Clone)]
pub struct FixtureDataSource {
    latency: Duration,
}

impl FixtureDataSource {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl DashboardDataSource for FixtureDataSource {
    async fn fetch_sales(&self, timeframe: Timeframe) -> anyhow::Result<SalesData> {
        self.simulate_latency().await;
        Ok(sales_fixture(timeframe))
    }

    async fn fetch_inventory(&self, warehouse: Warehouse) -> anyhow::Result<InventoryData> {
        self.simulate_latency().await;
        Ok(inventory_fixture(warehouse))
    }

    async fn fetch_market_trends(&self, query: &str) -> anyhow::Result<MarketTrend> {
        tracing::debug!("Fetching market trends for query: \"{}\"", query);
        self.simulate_latency().await;
        Ok(market_trend_fixture(query))
    }

    async fn fetch_social_metrics(&self, platform: Platform) -> anyhow::Result<SocialMetrics> {
        self.simulate_latency().await;
        Ok(social_fixture(platform))
    }
}

#[async_trait]
impl DashboardAssistant for FixtureDataSource {
    async fn process_command(&self, command: &str) -> anyhow::Result<CommandReply> {
        tracing::debug!("Processing command: \"{}\"", command);
        self.simulate_latency().await;
        Ok(command_reply(command_intent(command)))
    }

    async fn create_forecast(&self, metric: ForecastMetric, period: Timeframe) -> anyhow::Result<Forecast> {
        self.simulate_latency().await;
        Ok(forecast_fixture(metric, period))
    }
}

fn sales_fixture(timeframe: Timeframe) -> SalesData {
    let (labels, revenue): (Vec<&str>, Vec<f64>) = match timeframe {
        Timeframe::Daily => (
            vec!["9 AM", "10 AM", "11 AM", "12 PM", "1 PM", "2 PM", "3 PM", "4 PM", "5 PM"],
            vec![1200.0, 1800.0, 2200.0, 3500.0, 2700.0, 2100.0, 3200.0, 4100.0, 3700.0],
        ),
        Timeframe::Weekly => (
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
            vec![18500.0, 21000.0, 19200.0, 22500.0, 24700.0, 26100.0, 25200.0],
        ),
        Timeframe::Monthly => (
            vec!["Week 1", "Week 2", "Week 3", "Week 4"],
            vec![85000.0, 92000.0, 88000.0, 103000.0],
        ),
    };

    let units: [f64; 5] = match timeframe {
        Timeframe::Daily => [8.0, 6.0, 5.0, 4.0, 3.0],
        Timeframe::Weekly => [42.0, 38.0, 33.0, 27.0, 24.0],
        Timeframe::Monthly => [156.0, 142.0, 122.0, 104.0, 98.0],
    };

    // Channel and region splits scale with the period's revenue
    let total_revenue: f64 = match timeframe {
        Timeframe::Daily => 24700.0,
        Timeframe::Weekly => 157200.0,
        Timeframe::Monthly => 368000.0,
    };
    let split = |shares: &[f64]| -> Vec<f64> {
        shares.iter().map(|s| (total_revenue * s).round()).collect()
    };

    let (revenue_change, total_orders, order_change, aov, aov_change, conversion, conversion_change) =
        match timeframe {
            Timeframe::Daily => (12.0, 142, 8.0, 174.0, 4.0, 3.8, 0.6),
            Timeframe::Weekly => (8.0, 924, 5.0, 170.0, 2.0, 3.5, 0.2),
            Timeframe::Monthly => (15.0, 3840, 12.0, 168.0, -1.0, 3.6, 0.4),
        };

    SalesData {
        total_revenue,
        revenue_change,
        total_orders,
        order_change,
        average_order_value: aov,
        aov_change,
        conversion_rate: conversion,
        conversion_change,
        revenue_trend: ChartSeries::single("Revenue", &labels, &revenue),
        top_products: ChartSeries::single("Units Sold", &PRODUCTS, &units),
        sales_by_channel: ChartSeries::single(
            "Revenue ($)",
            &["Website", "Retail Partners", "Amazon", "B2B", "Direct Sales"],
            &split(&[0.34, 0.27, 0.17, 0.13, 0.09]),
        ),
        geographic_distribution: ChartSeries::single(
            "Revenue ($)",
            &["US", "Europe", "Middle East", "Asia", "Other"],
            &split(&[0.33, 0.19, 0.27, 0.14, 0.07]),
        ),
    }
}

fn warehouse_metrics(warehouse: Warehouse) -> Option<WarehouseMetrics> {
    let (capacity, total_products, low_stock, out_of_stock, recent_deliveries, pending_shipments) =
        match warehouse {
            Warehouse::LasVegas => (82, 5624, 12, 3, 4, 7),
            Warehouse::Nice => (65, 4218, 8, 2, 2, 5),
            Warehouse::Dubai => (43, 2876, 15, 6, 1, 10),
            Warehouse::Riyadh => (71, 3752, 9, 4, 3, 4),
            Warehouse::All => return None,
        };

    Some(WarehouseMetrics {
        capacity,
        total_products,
        low_stock,
        out_of_stock,
        recent_deliveries,
        pending_shipments,
    })
}

fn inventory_fixture(warehouse: Warehouse) -> InventoryData {
    // Stock per site in Warehouse::SITES order
    let catalog: [(&str, &str, [u32; 4], u32, u32); 5] = [
        ("p001", "MIN-DUA-100", [142, 87, 63, 95], 50, 30),
        ("p002", "MIN-MOO-100", [76, 54, 5, 42], 40, 20),
        ("p003", "MIN-MOM-100", [104, 73, 51, 88], 50, 30),
        ("p004", "MIN-DAH-100", [58, 37, 29, 44], 30, 20),
        ("p005", "MIN-COD-100", [89, 62, 48, 75], 40, 25),
    ];

    let products = catalog
        .iter()
        .zip(PRODUCTS)
        .map(|((id, sku, stock, low_stock_threshold, reorder_point), name)| {
            let mut per_site = Warehouse::SITES.iter().zip(stock);
            let stock = match warehouse {
                Warehouse::All => StockLevel::PerWarehouse(
                    per_site.map(|(site, units)| (site.to_string(), *units)).collect(),
                ),
                selected => StockLevel::Units(
                    per_site
                        .find(|(site, _)| **site == selected)
                        .map(|(_, units)| *units)
                        .unwrap_or_default(),
                ),
            };

            ProductStock {
                id: id.to_string(),
                name: name.to_string(),
                sku: sku.to_string(),
                stock,
                low_stock_threshold: *low_stock_threshold,
                reorder_point: *reorder_point,
            }
        })
        .collect();

    let warehouse_data = match warehouse_metrics(warehouse) {
        Some(metrics) => WarehouseView::Single(metrics),
        None => WarehouseView::All(
            Warehouse::SITES
                .iter()
                .filter_map(|site| warehouse_metrics(*site).map(|m| (site.to_string(), m)))
                .collect::<BTreeMap<_, _>>(),
        ),
    };

    InventoryData {
        warehouse_data,
        products,
    }
}

/// Pick the analysis whose topic appears in the query, case-insensitively,
/// falling back to a market overview.
fn market_trend_fixture(query: &str) -> MarketTrend {
    let query = query.to_lowercase();

    if query.contains("fragrance industry") {
        MarketTrend {
            title: "Fragrance Industry Trends".to_string(),
            summary: "Luxury fragrance market growing at 6.8% annually, with strong demand for niche brands and sustainable packaging. Direct-to-consumer channels showing 15% higher margins than traditional retail.".to_string(),
            data: json!({
                "marketGrowth": 6.8,
                "trendingCategories": ["Niche Luxury", "Sustainable", "Unisex"],
                "emergingMarkets": ["Southeast Asia", "Middle East"],
                "channelPerformance": {
                    "dtc": { "growth": 18.2, "margin": 65 },
                    "retail": { "growth": 4.3, "margin": 50 },
                    "ecommerce": { "growth": 22.5, "margin": 60 }
                }
            }),
        }
    } else if query.contains("competitors") {
        MarketTrend {
            title: "Competitor Analysis".to_string(),
            summary: "Byredo and Diptyque lead social engagement, while Nishane shows strongest YoY growth at 32%. Key differentiator for top performers is storytelling and limited editions rather than price point.".to_string(),
            data: json!({
                "leaders": ["Byredo", "Diptyque", "Le Labo"],
                "growthLeaders": ["Nishane", "D.S. & Durga", "Vilhelm"],
                "strategies": {
                    "successFactors": ["Brand storytelling", "Limited editions", "Sustainable practices"],
                    "pricePoints": { "average": 245, "range": { "min": 180, "max": 350 } }
                }
            }),
        }
    } else if query.contains("consumer preferences") {
        MarketTrend {
            title: "Consumer Preferences".to_string(),
            summary: "High-end fragrance consumers increasingly value authenticity and sustainability over celebrity endorsements. 78% willing to pay premium for unique scent profiles, and 65% research brand ethics before purchasing.".to_string(),
            data: json!({
                "demographics": {
                    "age": { "25-34": 28, "35-44": 32, "45-54": 24, "55+": 16 }
                },
                "preferences": {
                    "factors": [
                        { "name": "Unique scent profile", "importance": 78 },
                        { "name": "Brand ethics", "importance": 65 },
                        { "name": "Luxury packaging", "importance": 58 },
                        { "name": "Celebrity endorsement", "importance": 12 }
                    ]
                }
            }),
        }
    } else {
        MarketTrend {
            title: "Fragrance Market Overview".to_string(),
            summary: "Luxury fragrance market shows strong growth in direct-to-consumer channels, with sustainability and unique brand stories driving premium purchases. Middle East and Southeast Asia emerging as high-growth regions.".to_string(),
            data: json!({
                "overallGrowth": 6.8,
                "topTrends": ["Sustainability", "Storytelling", "Unique profiles"],
                "opportunities": ["D2C expansion", "Middle East presence", "Limited editions"]
            }),
        }
    }
}

// First match wins, so a command naming both sales and stock is a sales summary
const COMMAND_KEYWORDS: [(CommandIntent, &[&str]); 5] = [
    (CommandIntent::SalesSummary, &["sales", "revenue", "performance"]),
    (CommandIntent::InventoryCheck, &["inventory", "stock", "warehouse"]),
    (CommandIntent::SocialMediaMetrics, &["social", "instagram", "tiktok", "engagement"]),
    (CommandIntent::ScheduleReminder, &["remind", "reminder", "meeting", "schedule"]),
    (CommandIntent::CompetitorAnalysis, &["compare", "competitor", "byredo", "nishane"]),
];

fn command_intent(command: &str) -> CommandIntent {
    let command = command.to_lowercase();
    COMMAND_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| command.contains(k)))
        .map(|(intent, _)| *intent)
        .unwrap_or(CommandIntent::Unknown)
}

fn command_reply(intent: CommandIntent) -> CommandReply {
    let (text, data) = match intent {
        CommandIntent::SalesSummary => (
            "Today's sales are up 12% compared to yesterday, with $24,500 in total revenue. The 'Duality' fragrance is your top performer today with 8 units sold.",
            Some(json!({ "total": 24500, "change": 12, "topProduct": "Duality", "topProductSales": 8 })),
        ),
        CommandIntent::InventoryCheck => (
            "Current inventory: Las Vegas warehouse is at 82% capacity, Nice at 65%, Dubai at 43%, and Riyadh at 71%. The 'Moon Dust' fragrance is running low in Dubai with only 5 units left.",
            Some(json!({
                "warehouses": { "las-vegas": 82, "nice": 65, "dubai": 43, "riyadh": 71 },
                "lowStock": { "product": "Moon Dust", "location": "Dubai", "quantity": 5 }
            })),
        ),
        CommandIntent::SocialMediaMetrics => (
            "Your Instagram engagement is up 8% this week. The post featuring 'Momento' received the highest engagement with 1,245 likes and 87 comments.",
            Some(json!({
                "platform": "Instagram",
                "engagement": { "change": 8, "topPost": "Momento feature", "likes": 1245, "comments": 87 }
            })),
        ),
        CommandIntent::ScheduleReminder => (
            "I've scheduled a reminder for your investor meeting tomorrow at 2 PM. Would you like me to prepare a sales summary for the meeting?",
            Some(json!({
                "reminder": {
                    "title": "Investor Meeting",
                    "time": "2025-05-06T14:00:00",
                    "notes": "Quarterly review with investors"
                }
            })),
        ),
        CommandIntent::CompetitorAnalysis => (
            "Based on social media analysis, Byredo's latest launch received 22% more engagement than Nishane's, but MiN NEW YORK's 'Duality' outperformed both by 15% in engagement per follower, showing stronger community connection.",
            Some(json!({
                "competitors": {
                    "Byredo": { "engagement": 4250, "growth": 22 },
                    "Nishane": { "engagement": 3485, "growth": 8 },
                    "MiN NEW YORK": { "engagement": 3950, "growth": 15, "engagementPerFollower": 0.12 }
                }
            })),
        ),
        CommandIntent::Unknown => (
            "I'm not sure how to help with that request. You can ask about sales, inventory, social media, schedule reminders, or competitor analysis.",
            None,
        ),
    };

    CommandReply {
        text: text.to_string(),
        data,
        intent,
    }
}

fn forecast_fixture(metric: ForecastMetric, period: Timeframe) -> Forecast {
    use Direction::*;
    use Impact::*;

    let outlook = |name: &str, current, forecast: &[f64], growth, confidence, factors: [(&str, Impact, Direction); 3]| Forecast {
        metric: name.to_string(),
        period,
        current,
        forecast: forecast.to_vec(),
        growth,
        depletion: None,
        restock: None,
        confidence,
        factors: factors
            .iter()
            .map(|(name, impact, direction)| ForecastFactor::new(name, *impact, *direction))
            .collect(),
    };

    match metric {
        ForecastMetric::Sales => outlook(
            "Sales",
            Some(368_000.0),
            &[378_500.0, 392_700.0, 415_000.0, 428_300.0, 456_200.0, 478_900.0],
            Some(30.1),
            89,
            [
                ("Seasonal demand", High, Positive),
                ("Marketing campaigns", Medium, Positive),
                ("Competitive landscape", Low, Negative),
            ],
        ),
        ForecastMetric::Engagement => outlook(
            "Social Media Engagement",
            Some(12_450.0),
            &[13_200.0, 14_500.0, 15_800.0, 18_200.0, 22_500.0, 24_700.0],
            Some(98.4),
            82,
            [
                ("Content quality", High, Positive),
                ("Algorithm changes", Medium, Uncertain),
                ("Posting frequency", Medium, Positive),
            ],
        ),
        ForecastMetric::Inventory => Forecast {
            depletion: Some(31.2),
            restock: Some(49.4),
            ..outlook(
                "Inventory Levels",
                Some(5_624.0),
                &[5_420.0, 4_980.0, 4_150.0, 3_870.0, 5_230.0, 5_780.0],
                None,
                91,
                [
                    ("Sales velocity", High, Negative),
                    ("Supply chain efficiency", Medium, Positive),
                    ("Storage capacity", Low, Stable),
                ],
            )
        },
        ForecastMetric::General => outlook(
            "General Performance",
            None,
            &[],
            Some(25.8),
            85,
            [
                ("Market conditions", Medium, Positive),
                ("Brand reputation", High, Positive),
                ("Operational efficiency", Medium, Positive),
            ],
        ),
    }
}

fn demographics(ages: [f64; 4], genders: [f64; 3], locations: &[(&str, f64)]) -> Demographics {
    Demographics {
        age_groups: ["18-24", "25-34", "35-44", "45+"]
            .iter()
            .zip(ages)
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        genders: ["male", "female", "other"]
            .iter()
            .zip(genders)
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        top_locations: locations
            .iter()
            .map(|(location, percentage)| LocationShare {
                location: location.to_string(),
                percentage: *percentage,
            })
            .collect(),
    }
}

fn content(id: &str, caption: &str, engagement: u64, date: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        caption: caption.to_string(),
        engagement,
        date: date.to_string(),
    }
}

fn instagram_metrics() -> PlatformMetrics {
    PlatformMetrics {
        platform: "Instagram".to_string(),
        followers: 115_000,
        followers_change: 2.8,
        engagement: 9_775,
        engagement_change: 3.2,
        engagement_rate: 8.5,
        engagement_rate_change: 0.4,
        top_content: vec![
            content("ig-post-1", "Experience the timeless elegance of Momento.", 2450, "2025-04-28T14:30:00Z"),
            content("ig-post-2", "Duality. Two sides of the same story.", 2180, "2025-04-22T16:45:00Z"),
            content("ig-post-3", "Behind the scenes at our New York atelier.", 1850, "2025-04-15T13:20:00Z"),
        ],
        demographics: demographics(
            [22.0, 38.0, 26.0, 14.0],
            [42.0, 56.0, 2.0],
            &[("New York, USA", 18.0), ("Los Angeles, USA", 12.0), ("London, UK", 8.0)],
        ),
    }
}

fn tiktok_metrics() -> PlatformMetrics {
    PlatformMetrics {
        platform: "TikTok".to_string(),
        followers: 160_000,
        followers_change: 7.5,
        engagement: 24_320,
        engagement_change: 12.4,
        engagement_rate: 15.2,
        engagement_rate_change: 1.8,
        top_content: vec![
            content("tt-video-1", "How to layer fragrances like a pro. #FragranceTips", 8700, "2025-04-30T18:20:00Z"),
            content("tt-video-2", "Meet our master perfumer. #PerfumeCreator", 7850, "2025-04-20T15:10:00Z"),
            content("tt-video-3", "Moon Dust: Our most mysterious fragrance decoded.", 7200, "2025-04-12T14:45:00Z"),
        ],
        demographics: demographics(
            [35.0, 42.0, 18.0, 5.0],
            [38.0, 60.0, 2.0],
            &[("New York, USA", 16.0), ("Los Angeles, USA", 14.0), ("London, UK", 7.0)],
        ),
    }
}

fn social_fixture(platform: Platform) -> SocialMetrics {
    match platform {
        Platform::Instagram => SocialMetrics::Single(instagram_metrics()),
        Platform::Tiktok => SocialMetrics::Single(tiktok_metrics()),
        Platform::All => {
            let instagram = instagram_metrics();
            let tiktok = tiktok_metrics();
            let total_followers = instagram.followers + tiktok.followers;
            let total_engagement = instagram.engagement + tiktok.engagement;
            let top_platform = if tiktok.engagement >= instagram.engagement {
                tiktok.platform.clone()
            } else {
                instagram.platform.clone()
            };

            SocialMetrics::Combined {
                summary: SocialSummary {
                    total_followers,
                    total_engagement,
                    engagement_rate: 11.8,
                    growth_rate: 5.2,
                    top_platform,
                    most_engaging_content: "Product showcase videos".to_string(),
                    recommended_strategy: "Continue investing in short-form video content, particularly product demonstrations and behind-the-scenes content.".to_string(),
                },
                instagram,
                tiktok,
            }
        }
    }
}
