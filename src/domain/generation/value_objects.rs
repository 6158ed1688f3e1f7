//! Generation Context - Value Objects

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::GenerationError;

/// 产物唯一标识
///
/// 每个请求生成一个，决定最终产物的文件名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(Uuid);

/// 最终产物文件名前缀
pub const ARTIFACT_PREFIX: &str = "output-";

/// 最终产物文件扩展名
pub const ARTIFACT_EXTENSION: &str = "mp4";

impl ArtifactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// 产物文件名: `output-<32 位十六进制>.mp4`
    pub fn file_name(&self) -> String {
        format!(
            "{}{}.{}",
            ARTIFACT_PREFIX,
            self.0.simple(),
            ARTIFACT_EXTENSION
        )
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// 静态图片来源
///
/// 不变量:
/// - 构造时 path 指向的文件存在（不检查类型与可读性）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    path: PathBuf,
}

impl ImageSource {
    /// 校验图片路径存在
    pub async fn locate(path: impl AsRef<Path>) -> Result<Self, GenerationError> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(GenerationError::ImageNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 解码后的音频数据
///
/// 不变量:
/// - 来自严格的标准 base64 解码（填充必须正确，不跳过非法字符）
/// - 非空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload(Vec<u8>);

impl AudioPayload {
    pub fn from_base64(encoded: &str) -> Result<Self, GenerationError> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| GenerationError::InvalidAudioEncoding(e.to_string()))?;

        if bytes.is_empty() {
            return Err(GenerationError::EmptyAudio);
        }

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn byte_len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_file_name_is_unique() {
        let a = ArtifactId::new();
        let b = ArtifactId::new();

        assert_ne!(a.file_name(), b.file_name());
        assert!(a.file_name().starts_with("output-"));
        assert!(a.file_name().ends_with(".mp4"));
        // output- + 32 hex + .mp4
        assert_eq!(a.file_name().len(), 7 + 32 + 4);
    }

    #[tokio::test]
    async fn test_image_source_requires_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let image = ImageSource::locate(file.path()).await.unwrap();
        assert_eq!(image.path(), file.path());

        let err = ImageSource::locate("/definitely/not/here.png")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "image not found: /definitely/not/here.png"
        );
    }

    #[test]
    fn test_audio_payload_decodes_standard_base64() {
        let payload = AudioPayload::from_base64("SUQzBAA=").unwrap();
        assert_eq!(payload.as_bytes(), b"ID3\x04\x00");
        assert_eq!(payload.byte_len(), 5);
    }

    #[test]
    fn test_audio_payload_rejects_malformed_base64() {
        for input in ["not base64!", "SUQzBAA", "SUQz BAA=", "SUQzBAA=="] {
            let err = AudioPayload::from_base64(input).unwrap_err();
            assert!(
                matches!(err, GenerationError::InvalidAudioEncoding(_)),
                "expected decode failure for {input:?}, got {err:?}"
            );
            assert!(err.to_string().starts_with("invalid audioContent base64: "));
        }
    }

    #[test]
    fn test_audio_payload_rejects_empty() {
        assert_eq!(
            AudioPayload::from_base64("").unwrap_err(),
            GenerationError::EmptyAudio
        );
    }
}
