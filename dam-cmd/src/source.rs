use dam_core::fetch::PageFetcher;

/// Anything that can hand back the markup of a page.
#[async_trait::async_trait]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> dam_core::Result<String>;
}

#[async_trait::async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> dam_core::Result<String> {
        PageFetcher::fetch(self, url).await
    }
}
