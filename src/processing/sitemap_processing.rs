use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use log::{error, info};
use sitemap::structs::{ChangeFreq, UrlEntry};
use sitemap::writer::SiteMapWriter;
use std::collections::HashMap;
use std::fs;

use crate::api::{SearchClient, SearchSource};
use crate::config::Config;
use crate::error::ProcessingError;
use crate::models::{Id, SearchDocument};
use crate::utils::{Clock, SystemClock};

/// Темы, по которым собираются документы для sitemap. `ekologiya`
/// встречается дважды, дубли документов убираются по id.
pub const TOP_TOPICS: [&str; 45] = [
	"fizika",
	"matematika",
	"kimyo",
	"biologiya",
	"informatika",
	"tarix",
	"geografiya",
	"adabiyot",
	"ingliz tili",
	"ona tili",
	"suniy intellekt",
	"dasturlash",
	"internet",
	"kompyuter",
	"texnologiya",
	"ekologiya",
	"iqtisod",
	"huquq",
	"psixologiya",
	"pedagogika",
	"sport",
	"salomatlik",
	"tibbiyot",
	"musiqa",
	"san'at",
	"arxitektura",
	"dizayn",
	"biznes",
	"marketing",
	"moliya",
	"siyosat",
	"jamiyat",
	"madaniyat",
	"din",
	"falsafa",
	"astronomiya",
	"geologiya",
	"botanika",
	"zoologiya",
	"genetika",
	"atom",
	"energiya",
	"ekologiya",
	"iqlim",
	"tabiat",
];

/// Список документов без повторов: позиция первого появления, значение
/// последнего.
#[derive(Debug, Default)]
struct UniqueDocuments {
	docs: Vec<SearchDocument>,
	positions: HashMap<Id, usize>,
}

impl UniqueDocuments {
	fn extend(&mut self, batch: Vec<SearchDocument>) {
		for doc in batch {
			match self.positions.get(&doc.id) {
				Some(&index) => self.docs[index] = doc,
				None => {
					self.positions.insert(doc.id.clone(), self.docs.len());
					self.docs.push(doc);
				}
			}
		}
	}

	fn len(&self) -> usize {
		self.docs.len()
	}
}

/// Обходит темы по очереди, пока не наберется `limit` уникальных документов.
pub async fn collect_documents(
	source: &dyn SearchSource,
	topics: &[&str],
	limit: usize,
) -> Vec<SearchDocument> {
	if topics.is_empty() || limit == 0 {
		return Vec::new();
	}
	let page_size = limit.div_ceil(topics.len()) as u32;
	let mut unique = UniqueDocuments::default();

	for topic in topics {
		match source.search(topic, 1, page_size, None).await {
			Ok(batch) => {
				info!("{}: {} documents found", topic, batch.len());
				unique.extend(batch);
			}
			Err(e) => {
				error!("search failed for {}: {}", topic, e);
				continue;
			}
		}

		if unique.len() >= limit {
			info!("{} documents collected", limit);
			break;
		}
	}

	let mut docs = unique.docs;
	docs.truncate(limit);
	docs
}

/// Одна запись sitemap до записи в XML.
pub struct SitemapUrl {
	pub loc: String,
	pub changefreq: ChangeFreq,
	pub priority: f32,
}

fn url(loc: String, changefreq: ChangeFreq, priority: f32) -> SitemapUrl {
	SitemapUrl {
		loc,
		changefreq,
		priority,
	}
}

/// Все URL сайта в порядке вывода.
pub fn sitemap_urls(site_url: &str, docs: &[SearchDocument]) -> Vec<SitemapUrl> {
	let site = site_url.trim_end_matches('/');

	let mut urls = vec![
		url(format!("{}/", site), ChangeFreq::Weekly, 1.0),
		url(format!("{}/login", site), ChangeFreq::Monthly, 0.8),
		url(format!("{}/showcase", site), ChangeFreq::Hourly, 1.0),
	];
	urls.extend(
		docs.iter()
			.map(|doc| url(format!("{}/d/{}", site, doc.id), ChangeFreq::Weekly, 0.8)),
	);
	for (anchor, priority) in [("features", 0.8), ("pricing", 0.7), ("about", 0.6), ("faq", 0.5)] {
		urls.push(url(format!("{}/#{}", site, anchor), ChangeFreq::Monthly, priority));
	}
	urls
}

pub fn render_sitemap(
	site_url: &str,
	docs: &[SearchDocument],
	today: NaiveDate,
) -> Result<String, ProcessingError> {
	let sitemap_error = |e: sitemap::Error| ProcessingError::Sitemap(format!("{:?}", e));
	let lastmod: DateTime<FixedOffset> = Utc
		.from_utc_datetime(&today.and_time(NaiveTime::MIN))
		.fixed_offset();

	let mut output = Vec::new();
	let sitemap_writer = SiteMapWriter::new(&mut output);
	let mut urlwriter = sitemap_writer.start_urlset().map_err(sitemap_error)?;
	for entry in sitemap_urls(site_url, docs) {
		urlwriter
			.url(
				UrlEntry::builder()
					.loc(entry.loc)
					.changefreq(entry.changefreq)
					.priority(entry.priority)
					.lastmod(lastmod),
			)
			.map_err(sitemap_error)?;
	}
	urlwriter.end().map_err(sitemap_error)?;

	String::from_utf8(output).map_err(|e| ProcessingError::Sitemap(e.to_string()))
}

pub async fn sitemap_processing(config: &Config) -> Result<(), ProcessingError> {
	info!("sitemap: searching {} topics", TOP_TOPICS.len());
	let search = SearchClient::new(config.search_api_base.clone());
	let docs = collect_documents(&search, &TOP_TOPICS, config.sitemap_limit).await;
	info!("sitemap: {} unique documents", docs.len());

	let today = SystemClock.now().date_naive();
	let xml = render_sitemap(&config.site_url, &docs, today)?;

	if let Some(dir) = config.sitemap_output.parent() {
		if !dir.as_os_str().is_empty() {
			fs::create_dir_all(dir)?;
		}
	}
	fs::write(&config.sitemap_output, xml)?;

	info!(
		"sitemap written to {} ({} urls)",
		config.sitemap_output.display(),
		docs.len() + 7
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ApiError;
	use async_trait::async_trait;
	use parking_lot::Mutex;
	use serde_json::Map;

	fn doc(id: i64, title: &str) -> SearchDocument {
		SearchDocument {
			id: Id::Int(id),
			title: title.to_string(),
			extra: Map::new(),
		}
	}

	#[derive(Default)]
	struct FakeSearch {
		results: HashMap<String, Vec<SearchDocument>>,
		failing: Vec<String>,
		calls: Mutex<Vec<(String, u32)>>,
	}

	#[async_trait]
	impl SearchSource for FakeSearch {
		async fn search(
			&self,
			text: &str,
			page: u32,
			page_size: u32,
			doc_type: Option<&str>,
		) -> Result<Vec<SearchDocument>, ApiError> {
			assert_eq!(page, 1);
			assert!(doc_type.is_none());
			self.calls.lock().push((text.to_string(), page_size));
			if self.failing.iter().any(|t| t == text) {
				return Err(ApiError::UnexpectedResponse { status: 500 });
			}
			Ok(self.results.get(text).cloned().unwrap_or_default())
		}
	}

	#[tokio::test]
	async fn overlapping_topics_are_deduplicated() {
		let mut search = FakeSearch::default();
		search
			.results
			.insert("fizika".into(), vec![doc(1, "a"), doc(2, "b"), doc(3, "c")]);
		search.results.insert(
			"matematika".into(),
			vec![doc(3, "c2"), doc(4, "d"), doc(5, "e"), doc(6, "f")],
		);

		let docs = collect_documents(&search, &["fizika", "matematika"], 1000).await;
		let ids: Vec<String> = docs.iter().map(|d| d.id.to_string()).collect();
		assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
		assert_eq!(docs[2].title, "c2");
		assert_eq!(
			*search.calls.lock(),
			vec![("fizika".to_string(), 500), ("matematika".to_string(), 500)]
		);
	}

	#[tokio::test]
	async fn stops_once_limit_is_reached() {
		let mut search = FakeSearch::default();
		search
			.results
			.insert("a".into(), vec![doc(1, ""), doc(2, ""), doc(3, "")]);
		search
			.results
			.insert("b".into(), vec![doc(4, ""), doc(5, ""), doc(6, "")]);

		let docs = collect_documents(&search, &["a", "b", "c"], 5).await;
		assert_eq!(docs.len(), 5);
		let calls = search.calls.lock();
		assert_eq!(calls.len(), 2);
		assert_eq!(calls[0].1, 2);
	}

	#[tokio::test]
	async fn failed_topic_is_skipped() {
		let mut search = FakeSearch::default();
		search.failing.push("a".into());
		search.results.insert("b".into(), vec![doc(7, "x")]);

		let docs = collect_documents(&search, &["a", "b"], 10).await;
		assert_eq!(docs, vec![doc(7, "x")]);
	}

	#[tokio::test]
	async fn null_title_keeps_rest_of_batch() {
		let batch = crate::api::decode_search_results(
			r#"[{"id":1,"title":"a"},{"id":2,"title":null},{"id":3.0,"title":"c"},{"id":null}]"#,
		)
		.unwrap();
		let mut search = FakeSearch::default();
		search.results.insert("tarix".into(), batch);

		let docs = collect_documents(&search, &["tarix"], 10).await;
		assert_eq!(docs, vec![doc(1, "a"), doc(2, ""), doc(3, "c")]);

		let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
		let xml = render_sitemap("https://tqdm.uz", &docs, today).unwrap();
		assert!(xml.contains("https://tqdm.uz/d/2<"));
	}

	#[test]
	fn sitemap_lists_static_pages_around_documents() {
		let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
		let docs = vec![doc(11, "a"), doc(12, "b")];
		let urls = sitemap_urls("https://taqdimot.ismailov.uz/", &docs);
		let locs: Vec<&str> = urls.iter().map(|u| u.loc.as_str()).collect();
		assert_eq!(
			locs,
			[
				"https://taqdimot.ismailov.uz/",
				"https://taqdimot.ismailov.uz/login",
				"https://taqdimot.ismailov.uz/showcase",
				"https://taqdimot.ismailov.uz/d/11",
				"https://taqdimot.ismailov.uz/d/12",
				"https://taqdimot.ismailov.uz/#features",
				"https://taqdimot.ismailov.uz/#pricing",
				"https://taqdimot.ismailov.uz/#about",
				"https://taqdimot.ismailov.uz/#faq",
			]
		);

		let xml = render_sitemap("https://taqdimot.ismailov.uz", &docs, today).unwrap();
		assert!(xml.contains("<loc>https://taqdimot.ismailov.uz/d/12</loc>"));
		assert!(xml.contains("<changefreq>hourly</changefreq>"));
		assert!(xml.contains("2024-05-01"));
		assert_eq!(xml.matches("<url>").count(), 9);
	}
}
