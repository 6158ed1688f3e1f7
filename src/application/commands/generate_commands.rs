//! Generate Commands

/// 生成视频命令
#[derive(Debug, Clone)]
pub struct GenerateVideo {
    /// base64 编码的 MP3 数据
    pub audio_content: String,
    /// 静态图片路径
    pub image_path: String,
}
