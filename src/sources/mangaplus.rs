use crate::{
    SOURCE_ID,
    error::{Error, Result},
    net::HttpClient,
    search::rank_candidates,
    source::Source,
    types::{
        ChapterEntry, ChapterSlot, ImageTier, PageDescriptor, PageImage, SeriesCandidate,
        SeriesDetails, SourceConfig,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

/// Top-level envelope of every MANGA Plus JSON response
#[derive(Debug, Deserialize)]
struct MangaPlusResponse {
    success: Option<SuccessResult>,
    error: Option<ErrorResult>,
}

impl MangaPlusResponse {
    /// Unwraps the `success` payload or converts the error envelope
    fn into_success(self, context: &str) -> Result<SuccessResult> {
        match (self.success, self.error) {
            (Some(success), _) => Ok(success),
            (None, Some(error)) => Err(error.into_error(context)),
            (None, None) => Err(Error::api(format!(
                "{}: response has no success payload",
                context
            ))),
        }
    }
}

/// MANGA Plus error envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResult {
    english_popup: Option<Popup>,
    #[serde(default)]
    popups: Vec<Popup>,
}

impl ErrorResult {
    fn into_error(self, context: &str) -> Error {
        let popup = self.english_popup.or_else(|| {
            let mut popups = self.popups.into_iter();
            let first = popups.next()?;
            if first.is_english() {
                return Some(first);
            }
            popups.find(Popup::is_english).or(Some(first))
        });

        let Some(popup) = popup else {
            return Error::api(format!("{}: request rejected", context));
        };

        let subject = popup.subject.unwrap_or_default();
        let body = popup.body.unwrap_or_default();
        let message = match (subject.is_empty(), body.is_empty()) {
            (false, false) => format!("{}: {}", subject, body),
            (true, false) => body,
            (false, true) => subject,
            (true, true) => format!("{}: request rejected", context),
        };

        if message.to_lowercase().contains("not found") {
            Error::not_found(message)
        } else {
            Error::api(message)
        }
    }
}

/// Localized message attached to an error envelope
#[derive(Debug, Deserialize)]
struct Popup {
    subject: Option<String>,
    body: Option<String>,
    language: Option<String>,
}

impl Popup {
    fn is_english(&self) -> bool {
        self.language.as_deref().is_none_or(|lang| lang == "ENGLISH")
    }
}

/// Payload of a successful response; exactly one view is set per endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuccessResult {
    title_detail_view: Option<TitleDetailView>,
    manga_viewer: Option<MangaViewer>,
    all_titles_view_v2: Option<AllTitlesViewV2>,
}

/// Title index
#[derive(Debug, Deserialize)]
struct AllTitlesViewV2 {
    #[serde(rename = "AllTitlesGroup")]
    all_titles_group: Vec<AllTitlesGroup>,
}

/// One series in the index, with a title entry per published language
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllTitlesGroup {
    #[serde(default)]
    titles: Vec<Title>,
}

/// A title in one language; the canonical entry has no `language`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Title {
    title_id: u64,
    name: String,
    author: Option<String>,
    portrait_image_url: Option<String>,
    language: Option<String>,
}

/// Series detail
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitleDetailView {
    title: Title,
    title_image_url: Option<String>,
    overview: Option<String>,
    viewing_period_description: Option<String>,
    chapter_list_group: Option<Vec<ChapterListGroup>>,
}

/// Up to three chapter lists bundled by the API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
struct ChapterListGroup {
    chapter_numbers: Option<String>,
    first_chapter_list: Vec<MangaPlusChapter>,
    mid_chapter_list: Vec<MangaPlusChapter>,
    last_chapter_list: Vec<MangaPlusChapter>,
}

/// Chapter record inside a group list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MangaPlusChapter {
    chapter_id: u64,
    name: String,
    sub_title: Option<String>,
    start_time_stamp: i64,
}

/// Chapter viewer
#[derive(Debug, Deserialize)]
struct MangaViewer {
    pages: Vec<ViewerPage>,
}

/// Viewer slot; only slots with a `mangaPage` carry an image
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewerPage {
    manga_page: Option<MangaPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MangaPage {
    image_url: Option<String>,
    encryption_key: Option<String>,
}

impl ViewerPage {
    /// Image of this slot, if it is a real page with an image URL
    fn image(&self) -> Option<PageImage> {
        let page = self.manga_page.as_ref()?;
        let url = page.image_url.as_deref().filter(|url| !url.is_empty())?;
        Some(PageImage {
            url: url.to_string(),
            encryption_key: page.encryption_key.clone(),
        })
    }
}

/// Builds one unranked candidate per index entry from its untagged-language title.
///
/// Entries without such a title are left out.
fn index_candidates(view: &AllTitlesViewV2) -> Vec<SeriesCandidate> {
    view.all_titles_group
        .iter()
        .filter_map(|group| group.titles.iter().find(|title| title.language.is_none()))
        .map(|title| {
            SeriesCandidate::new(
                title.title_id.to_string(),
                title.name.clone(),
                title.portrait_image_url.clone(),
            )
        })
        .collect()
}

fn timestamp(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

/// Map a raw chapter record to a [`ChapterEntry`]
fn map_chapter(
    chapter: &MangaPlusChapter,
    group: Option<&str>,
    slot: ChapterSlot,
) -> ChapterEntry {
    let number = chapter
        .name
        .strip_prefix('#')
        .unwrap_or(&chapter.name)
        .to_string();
    let released = timestamp(chapter.start_time_stamp);

    ChapterEntry {
        identifier: chapter.chapter_id.to_string(),
        number,
        title: chapter
            .sub_title
            .clone()
            .unwrap_or_else(|| chapter.name.clone()),
        description: String::new(),
        group: group.map(str::to_string),
        variant: Some(slot),
        created_at: released,
        updated_at: released,
        published_at: released,
    }
}

/// Concatenates first, mid and last lists per group, groups in API order.
fn flatten_chapter_groups(groups: &[ChapterListGroup]) -> Vec<ChapterEntry> {
    groups
        .iter()
        .flat_map(|group| {
            let label = group.chapter_numbers.as_deref();
            [
                (ChapterSlot::First, &group.first_chapter_list),
                (ChapterSlot::Mid, &group.mid_chapter_list),
                (ChapterSlot::Last, &group.last_chapter_list),
            ]
            .into_iter()
            .flat_map(move |(slot, list)| {
                list.iter().map(move |chapter| map_chapter(chapter, label, slot))
            })
        })
        .collect()
}

/// Pairs the two tiers of a viewer by position.
///
/// The API returns both tiers in the same page order; nothing in the payload
/// links a high page to its low counterpart. Only the shorter length is walked
/// and an index is kept only when both tiers have an image there.
fn pair_pages(high: &[ViewerPage], low: &[ViewerPage]) -> Vec<PageDescriptor> {
    if high.len() != low.len() {
        warn!(
            high = high.len(),
            low = low.len(),
            "Image tiers differ in length, extra pages dropped"
        );
    }

    let pages: Vec<PageDescriptor> = high
        .iter()
        .zip(low.iter())
        .enumerate()
        .filter_map(|(index, (high, low))| {
            Some(PageDescriptor {
                index,
                high: high.image()?,
                low: low.image()?,
            })
        })
        .collect();

    debug!(
        paired = pages.len(),
        skipped = high.len().min(low.len()) - pages.len(),
        "Paired viewer pages"
    );
    pages
}

/// MANGA Plus source implementation.
///
/// Talks to the official web API. The title index is not searchable remotely, so
/// [`search`](Source::search) downloads the full index and ranks it locally.
/// Page images are XOR-obfuscated; each [`PageDescriptor`] carries the keys needed
/// to recover them.
///
/// # Examples
///
/// ```rust,no_run
/// use tosho_mangaplus::prelude::*;
///
/// # async fn example() -> tosho_mangaplus::Result<()> {
/// let source = MangaPlusSource::new();
///
/// let results = source.search("one piece").await?;
/// if let Some(series) = results.first() {
///     let chapters = source.get_chapters(&series.identifier).await?;
///     println!("{} has {} chapters", series.name, chapters.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct MangaPlusSource {
    client: HttpClient,
    config: SourceConfig,
}

impl MangaPlusSource {
    /// Create a new MANGA Plus source with the default configuration
    pub fn new() -> Self {
        Self::with_config(SourceConfig::default())
    }

    /// Create a source with custom endpoints or transport settings
    pub fn with_config(config: SourceConfig) -> Self {
        let client = HttpClient::new(SOURCE_ID)
            .with_max_retries(config.max_retries)
            .with_header("User-Agent", &config.user_agent)
            .with_header("Referer", &format!("{}/", config.site_url));

        Self { client, config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn title_index_url(&self) -> String {
        format!("{}/title_list/allV2?format=json", self.config.api_base)
    }

    fn title_detail_url(&self, series_id: &str) -> String {
        format!(
            "{}/title_detailV3?format=json&title_id={}",
            self.config.api_base,
            urlencoding::encode(series_id)
        )
    }

    fn viewer_url(&self, chapter_id: &str, tier: ImageTier) -> String {
        format!(
            "{}/manga_viewer?format=json&split=yes&chapter_id={}&img_quality={}",
            self.config.api_base,
            urlencoding::encode(chapter_id),
            tier.as_query()
        )
    }

    async fn fetch_title_detail(&self, series_id: &str) -> Result<TitleDetailView> {
        let response: MangaPlusResponse =
            self.client.get_json(&self.title_detail_url(series_id)).await?;

        response
            .into_success(&format!("Title {}", series_id))?
            .title_detail_view
            .ok_or_else(|| Error::decode("Response is missing titleDetailView"))
    }

    async fn fetch_viewer(&self, chapter_id: &str, tier: ImageTier) -> Result<MangaViewer> {
        let response: MangaPlusResponse = self
            .client
            .get_json(&self.viewer_url(chapter_id, tier))
            .await?;

        response
            .into_success(&format!("Chapter {}", chapter_id))?
            .manga_viewer
            .ok_or_else(|| Error::decode("Response is missing mangaViewer"))
    }

    /// Fetches title metadata for a series.
    ///
    /// # Errors
    ///
    /// * [`Error::NotFound`] - If the series doesn't exist
    /// * [`Error::Decode`] - If the detail view is missing or malformed
    pub async fn get_series_details(&self, series_id: &str) -> Result<SeriesDetails> {
        let detail = self.fetch_title_detail(series_id).await?;
        let title = detail.title;

        Ok(SeriesDetails {
            identifier: title.title_id.to_string(),
            name: title.name,
            author: title.author,
            cover_url: title.portrait_image_url.or(detail.title_image_url),
            overview: detail.overview.filter(|s| !s.trim().is_empty()),
            viewing_period: detail
                .viewing_period_description
                .filter(|s| !s.trim().is_empty()),
        })
    }
}

impl Default for MangaPlusSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for MangaPlusSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn name(&self) -> &'static str {
        "MANGA Plus"
    }

    fn base_url(&self) -> &str {
        &self.config.site_url
    }

    async fn search(&self, query: &str) -> Result<Vec<SeriesCandidate>> {
        let response: MangaPlusResponse = self.client.get_json(&self.title_index_url()).await?;

        let view = response
            .into_success("Title index")?
            .all_titles_view_v2
            .ok_or_else(|| Error::decode("Response is missing allTitlesViewV2"))?;

        let candidates = index_candidates(&view);
        let ranked = rank_candidates(query, &candidates, self.config.result_limit);

        debug!(
            query,
            indexed = candidates.len(),
            returned = ranked.len(),
            "Ranked title index"
        );
        Ok(ranked)
    }

    async fn get_chapters(&self, series_id: &str) -> Result<Vec<ChapterEntry>> {
        let detail = self.fetch_title_detail(series_id).await?;

        let groups = detail
            .chapter_list_group
            .ok_or_else(|| Error::decode("Title detail is missing chapterListGroup"))?;

        let chapters = flatten_chapter_groups(&groups);
        debug!(
            series_id,
            groups = groups.len(),
            chapters = chapters.len(),
            "Flattened chapter groups"
        );
        Ok(chapters)
    }

    async fn get_pages(&self, chapter_id: &str) -> Result<Vec<PageDescriptor>> {
        let (high, low) = futures::try_join!(
            self.fetch_viewer(chapter_id, ImageTier::High),
            self.fetch_viewer(chapter_id, ImageTier::Low),
        )?;

        Ok(pair_pages(&high.pages, &low.pages))
    }

    async fn fetch_page(&self, page: &PageDescriptor, tier: ImageTier) -> Result<Vec<u8>> {
        let bytes = self.client.get(&page.image(tier).url).await?;
        page.decrypt(tier, &bytes)
    }
}
