pub const IV_LEN: usize = 16;

/// 播放列表中的一个分片引用，序号从 1 开始
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRef {
    pub index: usize,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct PlaylistInfo {
    pub iv: [u8; IV_LEN],
    pub segments: Vec<SegmentRef>,
}

impl PlaylistInfo {
    pub fn iv_hex(&self) -> String {
        hex::encode(self.iv)
    }
}
