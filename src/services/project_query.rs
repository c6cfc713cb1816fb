//! # 项目列表查询
//!
//! 首页列表的过滤、排序、分页，以及概览统计。
//!
//! 结果只取决于 `(项目列表, 搜索词, 语言过滤, 排序键, 排序方向)` 和页码，
//! 不依赖调用顺序或之前的界面状态。
//!
//! ## 处理流程
//! 1. **过滤**：搜索词去掉首尾空白后非空时，按标题做大小写不敏感的子串匹配
//!    （`memchr::memmem::Finder` + rayon 并行）；再按语言过滤
//! 2. **排序**：稳定排序，键相同的项目保持拉取顺序
//! 3. **分页**：页码钳制在 `1..=总页数`，总页数至少为 1
//!
//! 概览统计优先采用服务端 `/getProfileStats` 给出的值，缺失的字段用本地列表计算。

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::api::ProfileStats;
use crate::models::project::ProjectSummary;
use crate::utils::time::{object_id_millis, parse_iso8601_millis};

/// 有过滤条件但没有匹配项时的提示
pub const NO_MATCHES: &str = "No projects match filters";

/// 用户还没有任何项目时的提示
pub const NO_PROJECTS: &str = "No projects yet. Create your first project!";

/// 语言过滤
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFilter {
    #[default]
    All,
    /// 只保留 `language` 与之完全相同的项目
    #[serde(untagged)]
    Only(String),
}

/// 排序键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// 标题（大小写不敏感）
    Title,
    Language,
    /// 创建时间：优先 `date`，其次 ObjectId 中的时间戳
    #[default]
    Date,
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// 列表查询参数（前端传入）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub search: String,
    pub language: LanguageFilter,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    /// 从 1 开始的页码
    pub page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            language: LanguageFilter::All,
            sort_key: SortKey::Date,
            sort_dir: SortDir::Desc,
            page: 1,
        }
    }
}

impl ListQuery {
    fn has_filters(&self) -> bool {
        !self.search.trim().is_empty() || self.language != LanguageFilter::All
    }
}

/// 一页查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    pub items: Vec<ProjectSummary>,
    /// 钳制后的实际页码
    pub page: usize,
    pub total_pages: usize,
    /// 过滤后的项目总数
    pub total_items: usize,
    /// 列表为空时展示的提示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

/// 过滤并排序，返回完整的有序子集
pub fn filter_and_sort(projects: &[ProjectSummary], query: &ListQuery) -> Vec<ProjectSummary> {
    let needle = query.search.to_lowercase();
    let finder = memchr::memmem::Finder::new(needle.as_bytes());
    let searching = !query.search.trim().is_empty();

    let mut list: Vec<ProjectSummary> = projects
        .par_iter()
        .filter(|p| !searching || finder.find(p.title.to_lowercase().as_bytes()).is_some())
        .filter(|p| match &query.language {
            LanguageFilter::All => true,
            LanguageFilter::Only(language) => &p.language == language,
        })
        .cloned()
        .collect();

    match query.sort_key {
        SortKey::Title => {
            sort_by_key_cached(&mut list, query.sort_dir, |p| p.title.to_lowercase())
        }
        SortKey::Language => sort_by_key_cached(&mut list, query.sort_dir, |p| p.language.clone()),
        SortKey::Date => sort_by_key_cached(&mut list, query.sort_dir, created_at_millis),
    }

    list
}

/// 过滤、排序并取出一页
pub fn query_projects(
    projects: &[ProjectSummary],
    query: &ListQuery,
    page_size: usize,
) -> ProjectPage {
    let page_size = page_size.max(1);
    let list = filter_and_sort(projects, query);

    let total_items = list.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = query.page.clamp(1, total_pages);

    let items: Vec<ProjectSummary> = list
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    let empty_message = if total_items > 0 {
        None
    } else if query.has_filters() {
        Some(NO_MATCHES)
    } else {
        Some(NO_PROJECTS)
    };

    ProjectPage {
        items,
        page,
        total_pages,
        total_items,
        empty_message,
    }
}

/// 项目的创建时间（毫秒）；两个来源都没有时为 None，升序时排在最前
fn created_at_millis(project: &ProjectSummary) -> Option<i64> {
    project
        .date
        .as_deref()
        .and_then(parse_iso8601_millis)
        .or_else(|| object_id_millis(&project.id))
}

/// 先计算排序键再做稳定排序；降序时只反转比较结果，相等元素仍保持原顺序
fn sort_by_key_cached<K, F>(list: &mut Vec<ProjectSummary>, dir: SortDir, key: F)
where
    K: Ord,
    F: Fn(&ProjectSummary) -> K,
{
    let mut keyed: Vec<(K, ProjectSummary)> = list.drain(..).map(|p| (key(&p), p)).collect();
    keyed.sort_by(|(a, _), (b, _)| match dir {
        SortDir::Asc => a.cmp(b),
        SortDir::Desc => b.cmp(a),
    });
    list.extend(keyed.into_iter().map(|(_, p)| p));
}

// ============ 概览统计 ============

/// 使用次数最多的语言
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCount {
    pub language: String,
    pub count: usize,
}

/// 首页概览统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_projects: usize,
    pub distinct_languages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_language: Option<LanguageCount>,
}

/// 计算概览统计
///
/// 使用次数相同的语言中，先出现在列表里的胜出；空语言字段不参与排名。
pub fn project_stats(projects: &[ProjectSummary]) -> ProjectStats {
    // 按首次出现顺序记录计数
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut distinct: Vec<&str> = Vec::new();

    for project in projects {
        let language = project.language.as_str();
        if !distinct.contains(&language) {
            distinct.push(language);
        }
        if language.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(l, _)| *l == language) {
            Some((_, count)) => *count += 1,
            None => counts.push((language, 1)),
        }
    }

    let top_language = counts
        .iter()
        .fold(None::<(&str, usize)>, |best, &(language, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((language, count)),
        })
        .map(|(language, count)| LanguageCount {
            language: language.to_string(),
            count,
        });

    ProjectStats {
        total_projects: projects.len(),
        distinct_languages: distinct.len(),
        top_language,
    }
}

/// 首页统计卡片：服务端数据优先，本地计算兜底
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_projects: u64,
    /// 活跃天数；服务端没有时退回 `daysCoding`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_days: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_coding: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_language: Option<String>,
    /// 与 `top_language` 同一来源的项目数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_language_count: Option<u64>,
    /// 始终按本地列表计算
    pub distinct_languages: usize,
}

/// 合并服务端统计与本地统计
pub fn overview_stats(local: ProjectStats, server: Option<ProfileStats>) -> OverviewStats {
    let server = server.unwrap_or_default();

    let server_top = server
        .languages
        .into_iter()
        .next()
        .and_then(|entry| match entry.language {
            Some(language) if !language.is_empty() => Some((language, entry.count)),
            _ => None,
        });
    let (top_language, top_language_count) = match (server_top, local.top_language) {
        (Some((language, count)), _) => (Some(language), count),
        (None, Some(local_top)) => (Some(local_top.language), Some(local_top.count as u64)),
        (None, None) => (None, None),
    };

    OverviewStats {
        total_projects: server
            .total_projects
            .unwrap_or(local.total_projects as u64),
        active_days: server.active_days.or(server.days_coding),
        days_coding: server.days_coding,
        join_date: server.join_date,
        top_language,
        top_language_count,
        distinct_languages: local.distinct_languages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::ProfileLanguage;

    fn p(id: &str, title: &str, language: &str, date: Option<&str>) -> ProjectSummary {
        ProjectSummary {
            id: id.into(),
            title: title.into(),
            language: language.into(),
            date: date.map(String::from),
        }
    }

    fn sample() -> Vec<ProjectSummary> {
        vec![
            p("1", "beta", "python", Some("2024-01-02T00:00:00Z")),
            p("2", "Alpha", "web", Some("2024-03-01T00:00:00Z")),
            p("3", "gamma", "python", Some("2024-02-01T00:00:00Z")),
            p("4", "ALPHABET", "c", Some("2024-01-01T00:00:00Z")),
        ]
    }

    fn ids(list: &[ProjectSummary]) -> Vec<&str> {
        list.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_query_is_newest_first() {
        let page = query_projects(&sample(), &ListQuery::default(), 6);
        assert_eq!(ids(&page.items), vec!["2", "3", "1", "4"]);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.empty_message, None);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = ListQuery {
            search: "alpha".into(),
            sort_key: SortKey::Title,
            sort_dir: SortDir::Asc,
            ..ListQuery::default()
        };
        assert_eq!(ids(&filter_and_sort(&sample(), &query)), vec!["2", "4"]);

        let blank = ListQuery {
            search: "   ".into(),
            ..ListQuery::default()
        };
        assert_eq!(filter_and_sort(&sample(), &blank).len(), 4);
    }

    #[test]
    fn test_language_filter_and_stable_ties() {
        let query = ListQuery {
            language: LanguageFilter::Only("python".into()),
            sort_key: SortKey::Language,
            sort_dir: SortDir::Desc,
            ..ListQuery::default()
        };
        // 同语言的项目保持拉取顺序
        assert_eq!(ids(&filter_and_sort(&sample(), &query)), vec!["1", "3"]);
    }

    #[test]
    fn test_result_is_independent_of_prior_calls() {
        let projects = sample();
        let query = ListQuery {
            sort_key: SortKey::Title,
            ..ListQuery::default()
        };
        let first = filter_and_sort(&projects, &query);
        let _ = filter_and_sort(&projects, &ListQuery::default());
        assert_eq!(filter_and_sort(&projects, &query), first);
    }

    #[test]
    fn test_date_falls_back_to_object_id() {
        let projects = vec![
            p("665ee6000000000000000000", "oid", "c", None),
            p("x", "undated", "c", None),
            p("d", "dated", "c", Some("2020-01-01T00:00:00Z")),
        ];
        let query = ListQuery {
            sort_dir: SortDir::Asc,
            ..ListQuery::default()
        };
        assert_eq!(
            ids(&filter_and_sort(&projects, &query)),
            vec!["x", "d", "665ee6000000000000000000"]
        );
    }

    #[test]
    fn test_pagination_clamps_page() {
        let projects: Vec<ProjectSummary> = (0..13)
            .map(|i| p(&i.to_string(), &format!("t{:02}", i), "c", None))
            .collect();
        let query = ListQuery {
            sort_key: SortKey::Title,
            sort_dir: SortDir::Asc,
            page: 99,
            ..ListQuery::default()
        };

        let page = query_projects(&projects, &query, 6);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(ids(&page.items), vec!["12"]);

        let first = query_projects(&projects, &ListQuery { page: 0, ..query }, 6);
        assert_eq!(first.page, 1);
        assert_eq!(first.items.len(), 6);
    }

    #[test]
    fn test_empty_messages() {
        let empty = query_projects(&[], &ListQuery::default(), 6);
        assert_eq!(empty.total_pages, 1);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.empty_message, Some(NO_PROJECTS));

        let query = ListQuery {
            search: "zzz".into(),
            ..ListQuery::default()
        };
        assert_eq!(
            query_projects(&sample(), &query, 6).empty_message,
            Some(NO_MATCHES)
        );
    }

    #[test]
    fn test_query_deserializes_from_ui() {
        let query: ListQuery = serde_json::from_value(serde_json::json!({
            "search": "a",
            "language": "all",
            "sortKey": "title",
            "sortDir": "asc",
        }))
        .unwrap();
        assert_eq!(query.language, LanguageFilter::All);
        assert_eq!(query.page, 1);

        let only: ListQuery =
            serde_json::from_value(serde_json::json!({ "language": "cpp" })).unwrap();
        assert_eq!(only.language, LanguageFilter::Only("cpp".into()));
        assert_eq!(only.sort_key, SortKey::Date);
    }

    #[test]
    fn test_stats_first_seen_wins_ties() {
        let projects = vec![
            p("1", "a", "java", None),
            p("2", "b", "c", None),
            p("3", "c", "c", None),
            p("4", "d", "java", None),
            p("5", "e", "", None),
        ];
        let stats = project_stats(&projects);
        assert_eq!(stats.total_projects, 5);
        assert_eq!(stats.distinct_languages, 3);
        assert_eq!(
            stats.top_language,
            Some(LanguageCount {
                language: "java".into(),
                count: 2
            })
        );
        assert_eq!(project_stats(&[]).top_language, None);
    }

    fn local_stats() -> ProjectStats {
        ProjectStats {
            total_projects: 3,
            distinct_languages: 2,
            top_language: Some(LanguageCount {
                language: "python".into(),
                count: 2,
            }),
        }
    }

    #[test]
    fn test_overview_prefers_server_values() {
        let server = ProfileStats {
            total_projects: Some(12),
            active_days: Some(9),
            days_coding: Some(40),
            join_date: Some("2024-01-15T08:00:00.000Z".into()),
            languages: vec![ProfileLanguage {
                language: Some("java".into()),
                count: Some(7),
            }],
        };

        let merged = overview_stats(local_stats(), Some(server));
        assert_eq!(merged.total_projects, 12);
        assert_eq!(merged.active_days, Some(9));
        assert_eq!(merged.days_coding, Some(40));
        assert_eq!(merged.top_language.as_deref(), Some("java"));
        assert_eq!(merged.top_language_count, Some(7));
        assert_eq!(merged.distinct_languages, 2);
    }

    #[test]
    fn test_overview_falls_back_to_local_counts() {
        // 服务端只给出 daysCoding，语言条目为空字符串
        let server = ProfileStats {
            days_coding: Some(40),
            languages: vec![ProfileLanguage {
                language: Some(String::new()),
                count: Some(1),
            }],
            ..ProfileStats::default()
        };

        let merged = overview_stats(local_stats(), Some(server));
        assert_eq!(merged.total_projects, 3);
        assert_eq!(merged.active_days, Some(40));
        assert_eq!(merged.top_language.as_deref(), Some("python"));
        assert_eq!(merged.top_language_count, Some(2));

        let offline = overview_stats(local_stats(), None);
        assert_eq!(offline.total_projects, 3);
        assert_eq!(offline.active_days, None);
        assert_eq!(offline.join_date, None);
    }
}
