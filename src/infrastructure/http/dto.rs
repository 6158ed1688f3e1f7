//! Data Transfer Objects

use serde::Deserialize;

// ============================================================================
// Generate DTOs
// ============================================================================

/// `POST /generate` 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// base64 编码的 MP3 数据
    pub audio_content: String,
    /// 图片路径，缺省时使用配置中的默认图片
    #[serde(default)]
    pub image_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_uses_camel_case() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"audioContent":"SUQz","imagePath":"/a.png"}"#).unwrap();
        assert_eq!(req.audio_content, "SUQz");
        assert_eq!(req.image_path.as_deref(), Some("/a.png"));
    }

    #[test]
    fn test_generate_request_image_path_optional() {
        let req: GenerateRequest = serde_json::from_str(r#"{"audioContent":"SUQz"}"#).unwrap();
        assert!(req.image_path.is_none());
    }

    #[test]
    fn test_generate_request_requires_audio() {
        assert!(serde_json::from_str::<GenerateRequest>(r#"{"imagePath":"/a.png"}"#).is_err());
    }
}
