use crate::core::report::ReportFormat;
use crate::utils::error::Result;
use crate::utils::format::NumberStyle;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where and how a blend report is written.
pub trait ReportSettings: Send + Sync {
    fn title(&self) -> &str;
    fn output_path(&self) -> &str;
    fn formats(&self) -> &[ReportFormat];
    fn compress(&self) -> bool;
    /// File stem shared by every output file (`<stem>.txt`, `<stem>.zip`, ...).
    fn file_stem(&self) -> &str;
    fn number_style(&self) -> NumberStyle;
}
