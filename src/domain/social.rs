// Social media domain models
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub caption: String,
    pub engagement: u64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShare {
    pub location: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    #[serde(default)]
    pub age_groups: BTreeMap<String, f64>,
    #[serde(default)]
    pub genders: BTreeMap<String, f64>,
    #[serde(default)]
    pub top_locations: Vec<LocationShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    pub platform: String,
    pub followers: u64,
    pub followers_change: f64,
    pub engagement: u64,
    pub engagement_change: f64,
    pub engagement_rate: f64,
    pub engagement_rate_change: f64,
    // Instagram reports posts, TikTok reports videos
    #[serde(rename = "topContent", alias = "topPosts", alias = "topVideos", default)]
    pub top_content: Vec<ContentItem>,
    #[serde(default)]
    pub demographics: Demographics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSummary {
    pub total_followers: u64,
    pub total_engagement: u64,
    pub engagement_rate: f64,
    pub growth_rate: f64,
    pub top_platform: String,
    pub most_engaging_content: String,
    pub recommended_strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SocialMetrics {
    Combined {
        instagram: PlatformMetrics,
        tiktok: PlatformMetrics,
        summary: SocialSummary,
    },
    Single(PlatformMetrics),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_videos_alias() {
        let json = r#"{
            "platform": "TikTok",
            "followers": 160000,
            "followersChange": 7.5,
            "engagement": 24320,
            "engagementChange": 12.4,
            "engagementRate": 15.2,
            "engagementRateChange": 1.8,
            "topVideos": [{
                "id": "tt-video-1",
                "caption": "How to layer fragrances like a pro.",
                "engagement": 8700,
                "likes": 7200,
                "date": "2025-04-30T18:20:00Z"
            }]
        }"#;

        let metrics: SocialMetrics = serde_json::from_str(json).unwrap();
        match metrics {
            SocialMetrics::Single(platform) => {
                assert_eq!(platform.top_content.len(), 1);
                assert!(platform.demographics.top_locations.is_empty());
            }
            other => panic!("expected single platform metrics, got {:?}", other),
        }
    }
}
