//! File-based Audio Cache Implementation
//!
//! 单层目录，每个条目一个文件：`{md5}.{ext}`。
//! 创建/修改时间取自文件元数据，不单独存储。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;

use crate::application::ports::{
    bytes_to_mb, mb_to_bytes, AudioCachePort, CacheError, CacheStats, CleanupSummary,
};
use crate::domain::AudioFormat;

const SECS_PER_DAY: u64 = 24 * 3600;

/// 写入中的临时文件：`{key}.{ext}.partial`
const PARTIAL_EXTENSION: &str = "partial";

/// 超过该时间的临时文件视为中断写入的残留
const PARTIAL_GRACE: Duration = Duration::from_secs(10 * 60);

/// 文件缓存配置
#[derive(Debug, Clone)]
pub struct FileCacheConfig {
    /// 缓存目录
    pub cache_dir: PathBuf,
    /// 新条目使用的音频格式（决定扩展名）
    pub format: AudioFormat,
    /// 最大缓存大小（MB）
    pub max_size_mb: u64,
    /// 条目最大年龄（天）
    pub max_age_days: u64,
    /// 触发容量淘汰的阈值（占 max_size_mb 的比例）
    pub cleanup_threshold: f64,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(".chirpy/audio_cache"),
            format: AudioFormat::Mp3,
            max_size_mb: 500,
            max_age_days: 30,
            cleanup_threshold: 0.8,
        }
    }
}

/// 扫描得到的缓存文件
#[derive(Debug, Clone)]
struct CacheFile {
    path: PathBuf,
    size: u64,
    modified: SystemTime,
}

/// 文件音频缓存
///
/// 不提供跨进程锁：另一个进程的淘汰可能删除刚写入的文件，
/// 结果只是下次读取未命中
pub struct FileAudioCache {
    config: FileCacheConfig,
}

impl FileAudioCache {
    /// 创建缓存实例，确保目录存在
    pub async fn new(config: FileCacheConfig) -> Result<Self, CacheError> {
        fs::create_dir_all(&config.cache_dir)
            .await
            .map_err(|e| CacheError::DirectoryUnavailable {
                path: config.cache_dir.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            cache_dir = %config.cache_dir.display(),
            format = %config.format,
            max_size_mb = config.max_size_mb,
            max_age_days = config.max_age_days,
            "FileAudioCache initialized"
        );

        Ok(Self { config })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }

    /// 条目文件路径
    pub fn entry_path(&self, cache_key: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{}.{}", cache_key, self.config.format.extension()))
    }

    fn max_age(&self) -> Duration {
        Duration::from_secs(self.config.max_age_days.saturating_mul(SECS_PER_DAY))
    }

    /// 修改时间在未来时按 0 计
    fn age_of(modified: SystemTime) -> Duration {
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO)
    }

    /// 只有扩展名为支持的音频格式的文件才属于缓存
    fn is_cache_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(AudioFormat::from_extension)
            .is_some()
    }

    /// 中断写入留下的临时文件，外层扩展名为 `partial`，内层为音频扩展名
    fn is_partial_file(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(PARTIAL_EXTENSION)
            && path
                .file_stem()
                .is_some_and(|stem| Self::is_cache_file(Path::new(stem)))
    }

    async fn list_files(&self) -> Vec<PathBuf> {
        self.list_paths(Self::is_cache_file).await
    }

    /// 列出目录中满足 `keep` 的路径；目录不可读时返回空列表
    async fn list_paths(&self, keep: fn(&Path) -> bool) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let mut entries = match fs::read_dir(&self.config.cache_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(
                    cache_dir = %self.config.cache_dir.display(),
                    error = %e,
                    "Cache directory not readable"
                );
                return files;
            }
        };

        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if keep(&path) {
                        files.push(path);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to read cache directory entry");
                    break;
                }
            }
        }

        files
    }

    /// 列出缓存文件及其元数据
    ///
    /// 列出与读取元数据之间被删除的文件直接跳过
    async fn scan(&self) -> Vec<CacheFile> {
        let paths = self.list_files().await;
        Self::stat_files(paths).await
    }

    async fn stat_files(paths: Vec<PathBuf>) -> Vec<CacheFile> {
        let mut scanned = Vec::new();

        for path in paths {
            let metadata = match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Skipping cache file");
                    continue;
                }
            };
            let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
            scanned.push(CacheFile {
                path,
                size: metadata.len(),
                modified,
            });
        }

        scanned
    }

    async fn remove(&self, path: &Path) -> bool {
        match fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Failed to remove cache file");
                false
            }
        }
    }

    /// 删除超过 `grace` 的临时文件，返回删除数量
    async fn remove_stale_partials(&self, grace: Duration) -> usize {
        let paths = self.list_paths(Self::is_partial_file).await;
        let mut removed = 0usize;

        for file in Self::stat_files(paths).await {
            if Self::age_of(file.modified) > grace && self.remove(&file.path).await {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed = removed, "Removed stale partial cache files");
        }
        removed
    }

    /// 删除列表中已过期的文件；单个文件失败不影响其余文件
    async fn remove_expired(&self, files: Vec<CacheFile>) -> CleanupSummary {
        let max_age = self.max_age();
        let mut summary = CleanupSummary::default();

        for file in files {
            if Self::age_of(file.modified) <= max_age {
                continue;
            }
            if self.remove(&file.path).await {
                summary.removed_count += 1;
                summary.removed_bytes += file.size;
                tracing::debug!(path = %file.path.display(), "Removed expired cache file");
            }
        }

        summary
    }

    /// 按修改时间从旧到新删除，直到总大小不超过 `target` 字节
    async fn evict_files(&self, mut files: Vec<CacheFile>, target: u64) -> (CleanupSummary, u64) {
        files.sort_by_key(|f| f.modified);

        let mut current: u64 = files.iter().map(|f| f.size).sum();
        let mut summary = CleanupSummary::default();

        for file in &files {
            if current <= target {
                break;
            }
            if self.remove(&file.path).await {
                current = current.saturating_sub(file.size);
                summary.removed_count += 1;
                summary.removed_bytes += file.size;
                tracing::debug!(path = %file.path.display(), "Evicted cache file");
            }
        }

        (summary, current)
    }

    async fn total_size_bytes(&self) -> u64 {
        self.scan().await.iter().map(|f| f.size).sum()
    }
}

#[async_trait]
impl AudioCachePort for FileAudioCache {
    async fn lookup(&self, cache_key: &str) -> Option<PathBuf> {
        let path = self.entry_path(cache_key);

        let metadata = fs::metadata(&path).await.ok()?;
        if !metadata.is_file() {
            return None;
        }

        let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        if Self::age_of(modified) < self.max_age() {
            return Some(path);
        }

        // 惰性过期
        if self.remove(&path).await {
            tracing::debug!(cache_key = %cache_key, "Removed expired cache entry on read");
        }
        None
    }

    async fn get(&self, cache_key: &str) -> Option<Vec<u8>> {
        let path = self.lookup(cache_key).await?;
        match fs::read(&path).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Failed to read cache file");
                None
            }
        }
    }

    async fn put(&self, cache_key: &str, audio_data: &[u8]) -> Result<PathBuf, CacheError> {
        let path = self.entry_path(cache_key);
        // 先写临时文件再改名，半截数据不会以缓存条目的形式出现
        let tmp_path = path.with_extension(format!(
            "{}.{}",
            self.config.format.extension(),
            PARTIAL_EXTENSION
        ));

        fs::write(&tmp_path, audio_data)
            .await
            .map_err(|e| CacheError::IoError(e.to_string()))?;

        if fs::rename(&tmp_path, &path).await.is_err() {
            // Windows 上目标存在时 rename 失败
            let _ = fs::remove_file(&path).await;
            if let Err(e) = fs::rename(&tmp_path, &path).await {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(CacheError::IoError(e.to_string()));
            }
        }

        tracing::debug!(
            cache_key = %cache_key,
            size_bytes = audio_data.len(),
            "Audio cached"
        );

        self.size_check().await;

        Ok(path)
    }

    async fn sweep_expired(&self) -> CleanupSummary {
        self.remove_stale_partials(PARTIAL_GRACE).await;

        let files = self.scan().await;
        let summary = self.remove_expired(files).await;

        if summary.removed_count > 0 {
            tracing::info!(
                removed = summary.removed_count,
                removed_mb = %format!("{:.1}", summary.removed_mb()),
                "Cache cleanup: removed expired files"
            );
        }

        summary
    }

    async fn size_check(&self) -> Option<CleanupSummary> {
        let current = self.total_size_bytes().await;
        let max_size_mb = self.config.max_size_mb as f64;
        let threshold = mb_to_bytes(max_size_mb * self.config.cleanup_threshold);

        if current <= threshold {
            return None;
        }

        tracing::info!(
            current_mb = %format!("{:.1}", bytes_to_mb(current)),
            threshold_mb = %format!("{:.1}", bytes_to_mb(threshold)),
            "Cache size exceeds threshold, cleaning up"
        );

        // 淘汰目标是完整的 max_size_mb，而不是触发阈值
        Some(self.evict_to_size(max_size_mb).await)
    }

    async fn evict_to_size(&self, target_mb: f64) -> CleanupSummary {
        let files = self.scan().await;
        let (summary, current) = self.evict_files(files, mb_to_bytes(target_mb)).await;

        if summary.removed_count > 0 {
            tracing::info!(
                removed = summary.removed_count,
                removed_mb = %format!("{:.1}", summary.removed_mb()),
                remaining_mb = %format!("{:.1}", bytes_to_mb(current)),
                "Size-based cleanup: removed oldest files"
            );
        }

        summary
    }

    async fn stats(&self) -> CacheStats {
        let files = self.scan().await;

        let total_size_bytes: u64 = files.iter().map(|f| f.size).sum();
        let oldest = files.iter().map(|f| f.modified).min();
        let oldest_file_age_days = oldest
            .map(|m| Self::age_of(m).as_secs_f64() / SECS_PER_DAY as f64)
            .unwrap_or(0.0);

        CacheStats {
            file_count: files.len(),
            total_size_bytes,
            total_size_mb: bytes_to_mb(total_size_bytes),
            oldest_file_age_days,
            oldest_modified: oldest.map(DateTime::<Utc>::from),
            cache_dir: self.config.cache_dir.clone(),
            max_size_mb: self.config.max_size_mb,
            max_age_days: self.config.max_age_days,
        }
    }

    /// 删除所有条目，返回删除数量；同时清理中断写入的残留临时文件（不计入返回值）
    async fn clear(&self) -> usize {
        self.remove_stale_partials(PARTIAL_GRACE).await;

        let mut removed = 0usize;
        for path in self.list_files().await {
            if self.remove(&path).await {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed = removed, "Cleared cache files");
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const KB: usize = 1024;

    fn test_config(dir: &Path) -> FileCacheConfig {
        FileCacheConfig {
            cache_dir: dir.to_path_buf(),
            format: AudioFormat::Mp3,
            max_size_mb: 10,
            max_age_days: 30,
            cleanup_threshold: 0.8,
        }
    }

    /// 写入指定大小的文件，并把修改时间回拨 `age_days` 天
    fn write_aged_file(dir: &Path, name: &str, size: usize, age_days: u64) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, vec![b'0'; size]).unwrap();
        set_age(&path, age_days);
        path
    }

    fn set_age(path: &Path, age_days: u64) {
        let modified = SystemTime::now() - Duration::from_secs(age_days * SECS_PER_DAY);
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let audio_data = vec![0x49, 0x44, 0x33, 0x04, 0x00, 0xff];
        let path = cache.put("abc123", &audio_data).await.unwrap();
        assert_eq!(path, dir.path().join("abc123.mp3"));

        let result = cache.get("abc123").await;
        assert_eq!(result, Some(audio_data));
        assert_eq!(cache.lookup("abc123").await, Some(path));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        assert!(cache.get("missing").await.is_none());
        assert!(cache.lookup("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_entry() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        cache.put("key", b"first").await.unwrap();
        cache.put("key", b"second").await.unwrap();

        assert_eq!(cache.get("key").await, Some(b"second".to_vec()));
        assert_eq!(cache.stats().await.file_count, 1);
    }

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = FileAudioCache::new(test_config(&nested)).await.unwrap();

        assert!(nested.is_dir());
        assert_eq!(cache.cache_dir(), nested.as_path());
    }

    #[tokio::test]
    async fn test_get_expires_old_entry_lazily() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let expired = write_aged_file(dir.path(), "old.mp3", KB, 31);
        let fresh = write_aged_file(dir.path(), "fresh.mp3", KB, 29);

        assert!(cache.get("old").await.is_none());
        assert!(!expired.exists());

        assert!(cache.get("fresh").await.is_some());
        assert!(fresh.exists());
    }

    #[tokio::test]
    async fn test_sweep_expired_removes_only_old_files() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let old_a = write_aged_file(dir.path(), "old_a.mp3", 2 * KB, 31);
        let old_b = write_aged_file(dir.path(), "old_b.mp3", 3 * KB, 45);
        let recent = write_aged_file(dir.path(), "recent.mp3", KB, 29);

        let summary = cache.sweep_expired().await;

        assert_eq!(summary.removed_count, 2);
        assert_eq!(summary.removed_bytes, 5 * KB as u64);
        assert!(!old_a.exists());
        assert!(!old_b.exists());
        assert!(recent.exists());
    }

    #[tokio::test]
    async fn test_sweep_expired_is_idempotent() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        write_aged_file(dir.path(), "old.mp3", KB, 40);
        write_aged_file(dir.path(), "new.mp3", KB, 1);

        assert_eq!(cache.sweep_expired().await.removed_count, 1);
        assert_eq!(cache.sweep_expired().await, CleanupSummary::default());
        assert_eq!(cache.stats().await.file_count, 1);
    }

    #[tokio::test]
    async fn test_cleanup_preserves_non_audio_files() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let audio = write_aged_file(dir.path(), "audio.mp3", KB, 35);
        let notes = write_aged_file(dir.path(), "notes.txt", KB, 40);
        std::fs::create_dir(dir.path().join("nested.wav")).unwrap();

        cache.sweep_expired().await;
        assert!(!audio.exists());
        assert!(notes.exists());

        assert_eq!(cache.clear().await, 0);
        assert!(notes.exists());
        assert_eq!(cache.stats().await.file_count, 0);
    }

    #[tokio::test]
    async fn test_evict_to_size_removes_oldest_first() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let oldest = write_aged_file(dir.path(), "oldest.mp3", 400 * KB, 3);
        let middle = write_aged_file(dir.path(), "middle.mp3", 400 * KB, 2);
        let newest = write_aged_file(dir.path(), "newest.mp3", 400 * KB, 1);

        let summary = cache.evict_to_size(0.5).await;

        assert_eq!(summary.removed_count, 2);
        assert!(!oldest.exists());
        assert!(!middle.exists());
        assert!(newest.exists());
    }

    #[tokio::test]
    async fn test_evict_to_size_noop_when_under_target() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        write_aged_file(dir.path(), "a.mp3", 100 * KB, 2);
        write_aged_file(dir.path(), "b.mp3", 100 * KB, 1);

        assert_eq!(cache.evict_to_size(1.0).await, CleanupSummary::default());
        assert_eq!(cache.stats().await.file_count, 2);
    }

    #[tokio::test]
    async fn test_put_triggers_size_based_cleanup() {
        let dir = tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.max_size_mb = 1;
        let cache = FileAudioCache::new(config).await.unwrap();

        let oldest = write_aged_file(dir.path(), "a.mp3", 300 * KB, 3);
        let middle = write_aged_file(dir.path(), "b.mp3", 300 * KB, 2);
        let newer = write_aged_file(dir.path(), "c.mp3", 300 * KB, 1);

        // 1200KB > 0.8MB 触发淘汰，淘汰到 1MB (1024KB) 为止
        let written = cache.put("d", &vec![1u8; 300 * KB]).await.unwrap();

        assert!(!oldest.exists());
        assert!(middle.exists());
        assert!(newer.exists());
        assert!(written.exists());
    }

    #[tokio::test]
    async fn test_size_check_below_threshold() {
        let dir = tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.max_size_mb = 1;
        let cache = FileAudioCache::new(config).await.unwrap();

        write_aged_file(dir.path(), "a.mp3", 500 * KB, 1);

        assert!(cache.size_check().await.is_none());
        assert_eq!(cache.stats().await.file_count, 1);
    }

    #[tokio::test]
    async fn test_stats_reports_counts_and_age() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        write_aged_file(dir.path(), "a.mp3", 512 * KB, 5);
        write_aged_file(dir.path(), "b.wav", 512 * KB, 1);

        let stats = cache.stats().await;
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_size_bytes, 1024 * KB as u64);
        assert!((stats.total_size_mb - 1.0).abs() < 1e-9);
        assert!(stats.oldest_file_age_days > 4.9 && stats.oldest_file_age_days < 5.1);
        assert!(stats.oldest_modified.is_some());
        assert_eq!(stats.cache_dir, dir.path());
    }

    #[tokio::test]
    async fn test_stats_empty_directory() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let stats = cache.stats().await;
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.total_size_mb, 0.0);
        assert_eq!(stats.oldest_file_age_days, 0.0);
        assert!(stats.oldest_modified.is_none());
    }

    #[tokio::test]
    async fn test_clear_empties_directory() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        for i in 0..5 {
            cache.put(&format!("key{}", i), b"audio").await.unwrap();
        }

        assert_eq!(cache.clear().await, 5);
        assert_eq!(cache.stats().await.file_count, 0);
    }

    #[tokio::test]
    async fn test_sweep_removes_stale_partial_files() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let stale = dir.path().join("stale.mp3.partial");
        std::fs::write(&stale, vec![b'0'; KB]).unwrap();
        let modified = SystemTime::now() - Duration::from_secs(3600);
        std::fs::File::options()
            .write(true)
            .open(&stale)
            .unwrap()
            .set_modified(modified)
            .unwrap();
        let fresh = dir.path().join("fresh.mp3.partial");
        std::fs::write(&fresh, vec![b'0'; KB]).unwrap();
        let unrelated = dir.path().join("notes.partial");
        std::fs::write(&unrelated, b"keep").unwrap();
        write_aged_file(dir.path(), "recent.mp3", KB, 1);

        let summary = cache.sweep_expired().await;
        assert_eq!(summary.removed_count, 0);
        assert!(!stale.exists());
        assert!(fresh.exists());
        assert!(unrelated.exists());
        assert!(dir.path().join("recent.mp3").exists());
    }

    #[tokio::test]
    async fn test_clear_removes_stale_partial_files() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let stale = write_aged_file(dir.path(), "stale.opus.partial", KB, 2);
        write_aged_file(dir.path(), "entry.mp3", KB, 0);

        assert_eq!(cache.clear().await, 1);
        assert!(!stale.exists());
        assert_eq!(cache.stats().await.file_count, 0);
    }

    #[test]
    fn test_partial_file_detection() {
        assert!(FileAudioCache::is_partial_file(Path::new("abc.mp3.partial")));
        assert!(FileAudioCache::is_partial_file(Path::new("abc.wav.partial")));
        assert!(!FileAudioCache::is_partial_file(Path::new("abc.partial")));
        assert!(!FileAudioCache::is_partial_file(Path::new("abc.txt.partial")));
        assert!(!FileAudioCache::is_partial_file(Path::new("abc.mp3")));
    }

    #[tokio::test]
    async fn test_sweep_continues_past_vanished_file() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        write_aged_file(dir.path(), "a.mp3", KB, 40);
        let vanished = write_aged_file(dir.path(), "b.mp3", KB, 40);
        write_aged_file(dir.path(), "c.mp3", KB, 40);

        let files = cache.scan().await;
        assert_eq!(files.len(), 3);
        std::fs::remove_file(&vanished).unwrap();

        let summary = cache.remove_expired(files).await;
        assert_eq!(summary.removed_count, 2);
        assert_eq!(summary.removed_bytes, 2 * KB as u64);
        assert!(!dir.path().join("a.mp3").exists());
        assert!(!dir.path().join("c.mp3").exists());
    }

    #[tokio::test]
    async fn test_evict_continues_past_vanished_file() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        let oldest = write_aged_file(dir.path(), "oldest.mp3", 400 * KB, 3);
        write_aged_file(dir.path(), "middle.mp3", 400 * KB, 2);
        write_aged_file(dir.path(), "newest.mp3", 400 * KB, 1);

        let files = cache.scan().await;
        std::fs::remove_file(&oldest).unwrap();

        // 过期列表仍把 oldest 计入总量；删除失败后继续处理下一个文件
        let (summary, _) = cache.evict_files(files, mb_to_bytes(0.5)).await;
        assert_eq!(summary.removed_count, 2);
        assert!(!dir.path().join("middle.mp3").exists());
        assert!(!dir.path().join("newest.mp3").exists());
    }

    #[tokio::test]
    async fn test_stat_skips_unreadable_entries() {
        let dir = tempdir().unwrap();
        let kept = write_aged_file(dir.path(), "kept.mp3", KB, 1);

        let files = FileAudioCache::stat_files(vec![
            dir.path().join("gone.mp3"),
            kept.clone(),
        ])
        .await;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, kept);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stats_tolerates_dangling_entry() {
        let dir = tempdir().unwrap();
        let cache = FileAudioCache::new(test_config(dir.path())).await.unwrap();

        write_aged_file(dir.path(), "a.mp3", KB, 1);
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling.mp3"))
            .unwrap();

        let stats = cache.stats().await;
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.total_size_bytes, KB as u64);
        assert_eq!(cache.sweep_expired().await.removed_count, 0);
    }

    #[tokio::test]
    async fn test_operations_tolerate_missing_directory() {
        let dir = tempdir().unwrap();
        let cache_dir = dir.path().join("cache");
        let cache = FileAudioCache::new(test_config(&cache_dir)).await.unwrap();
        std::fs::remove_dir_all(&cache_dir).unwrap();

        assert_eq!(cache.clear().await, 0);
        assert_eq!(cache.sweep_expired().await, CleanupSummary::default());
        assert_eq!(cache.stats().await.file_count, 0);
        assert!(cache.get("anything").await.is_none());
    }
}
