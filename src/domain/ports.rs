use crate::domain::model::{EndpointSpec, Record, ServerReply};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// 遠端 API 的存取介面，測試時以計數用的 mock 實作替換
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// 存活探測，成功時回傳伺服器的狀態訊息
    async fn probe_health(&self) -> Result<Option<String>>;

    /// 驗證 access key 是否被伺服器接受
    async fn verify_access(&self) -> Result<ServerReply>;

    /// 送出單筆記錄
    async fn submit(&self, endpoint: &EndpointSpec, record: &Record) -> Result<ServerReply>;
}
