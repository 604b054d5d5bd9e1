use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// 持有工作目录，离开作用域时删除。
///
/// 运行被中断、出错或 future 被丢弃时同样生效。
pub struct WorkspaceGuard {
    path: PathBuf,
}

impl WorkspaceGuard {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 删除已有内容后重新创建
    pub async fn reset(&self) -> std::io::Result<()> {
        if tokio::fs::try_exists(&self.path).await? {
            tokio::fs::remove_dir_all(&self.path).await?;
        }
        tokio::fs::create_dir_all(&self.path).await?;
        debug!("工作目录已就绪: {:?}", self.path);
        Ok(())
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        info!("清理工作目录 {:?}", self.path);
        // Drop 中无法 await，这里同步删除
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("工作目录已删除"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("清理工作目录失败: {}", e),
        }
    }
}
