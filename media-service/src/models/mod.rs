use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kind of asset stored on the media host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Image,
    Video,
    Raw,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
            ResourceType::Raw => "raw",
        }
    }

    /// Absent or blank values fall back to images.
    pub fn parse_optional(value: Option<&str>) -> Result<Self, String> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(ResourceType::Image),
            Some(v) => v.parse(),
        }
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(ResourceType::Image),
            "video" => Ok(ResourceType::Video),
            "raw" => Ok(ResourceType::Raw),
            other => Err(format!(
                "Invalid resourceType: {}. Must be 'image', 'video' or 'raw'",
                other
            )),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags arrive either as an array or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    List(Vec<String>),
    Joined(String),
}

impl TagList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TagList::List(tags) => tags,
            TagList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUploadRequest {
    pub folder: Option<String>,
    pub tags: Option<TagList>,
    pub transformation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUploadResponse {
    pub signature: String,
    pub timestamp: i64,
    pub cloud_name: String,
    pub api_key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMediaRequest {
    pub public_id: Option<String>,
    pub resource_type: Option<String>,
}

/// Outcome reported by the host, e.g. `ok` or `not found`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMediaResponse {
    pub result: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMediaQuery {
    pub folder: Option<String>,
    pub resource_type: Option<String>,
}

/// One stored asset as the host describes it. Field names follow the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub public_id: String,
    #[serde(default)]
    pub secure_url: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMediaResponse {
    pub resources: Vec<MediaAsset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_parsing() {
        assert_eq!(ResourceType::parse_optional(None), Ok(ResourceType::Image));
        assert_eq!(ResourceType::parse_optional(Some(" ")), Ok(ResourceType::Image));
        assert_eq!(ResourceType::parse_optional(Some("Video")), Ok(ResourceType::Video));
        assert!(ResourceType::parse_optional(Some("audio")).is_err());
    }

    #[test]
    fn test_tags_accept_array_or_string() {
        let from_array: SignUploadRequest =
            serde_json::from_str(r#"{"folder":"f","tags":["a","b"]}"#).unwrap();
        let from_string: SignUploadRequest =
            serde_json::from_str(r#"{"folder":"f","tags":"a,b"}"#).unwrap();

        assert_eq!(from_array.tags.unwrap().into_vec(), vec!["a", "b"]);
        assert_eq!(from_string.tags.unwrap().into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn test_asset_tolerates_missing_fields() {
        let asset: MediaAsset = serde_json::from_str(r#"{"public_id":"weddings/a"}"#).unwrap();
        assert_eq!(asset.public_id, "weddings/a");
        assert!(asset.tags.is_empty());
        assert!(asset.context.is_none());
    }
}
