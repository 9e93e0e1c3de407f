use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ChatSettings: Send + Sync {
    fn default_reply(&self) -> &str;
    fn not_playing_reply(&self) -> &str;
    fn max_patterns(&self) -> usize;
    fn reply_to_observers(&self) -> bool;
    fn seed(&self) -> Option<u64>;
}
