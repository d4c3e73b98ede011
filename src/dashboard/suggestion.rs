//! Color suggestions for a new or edited tile.
//!
//! Sources, strongest first: a known-site table, keywords in the hostname,
//! keywords in the name, and the colors already used by similar sites.

use serde::Serialize;
use std::collections::HashMap;

use crate::dashboard::favicon::hostname;
use crate::models::Tile;

pub const MAX_SUGGESTIONS: usize = 3;

const EXACT_DOMAIN_CONFIDENCE: f32 = 0.9;
const DOMAIN_KEYWORD_CONFIDENCE: f32 = 0.7;
const NAME_KEYWORD_CONFIDENCE: f32 = 0.6;
const SIBLING_CONFIDENCE: f32 = 0.5;

/// Brand colors for well-known sites, keyed by www-stripped hostname.
static DOMAIN_COLORS: &[(&str, &str)] = &[
    ("google.com", "#4285F4"),
    ("baidu.com", "#2319DC"),
    ("github.com", "#24292E"),
    ("gitlab.com", "#FC6D26"),
    ("chatgpt.com", "#10A37F"),
    ("openai.com", "#10A37F"),
    ("claude.ai", "#D97757"),
    ("youtube.com", "#FF0000"),
    ("bilibili.com", "#FB7299"),
    ("zhihu.com", "#0066FF"),
    ("weibo.com", "#E6162D"),
    ("douban.com", "#007722"),
    ("taobao.com", "#FF5000"),
    ("jd.com", "#E1251B"),
    ("twitter.com", "#1DA1F2"),
    ("x.com", "#000000"),
    ("facebook.com", "#1877F2"),
    ("instagram.com", "#E4405F"),
    ("linkedin.com", "#0A66C2"),
    ("reddit.com", "#FF4500"),
    ("stackoverflow.com", "#F48024"),
    ("wikipedia.org", "#636466"),
    ("notion.so", "#000000"),
    ("figma.com", "#F24E1E"),
    ("netflix.com", "#E50914"),
    ("spotify.com", "#1DB954"),
    ("amazon.com", "#FF9900"),
    ("apple.com", "#555555"),
    ("microsoft.com", "#00A4EF"),
    ("docs.rs", "#DEA584"),
    ("crates.io", "#DEA584"),
];

/// Category keywords, scanned in this order.
static KEYWORD_COLORS: &[(&str, &str, &str)] = &[
    ("mail", "#EA4335", "email"),
    ("邮箱", "#EA4335", "email"),
    ("news", "#BE002F", "news"),
    ("新闻", "#BE002F", "news"),
    ("video", "#FF0000", "video"),
    ("tv", "#FF0000", "video"),
    ("视频", "#FF0000", "video"),
    ("music", "#1DB954", "music"),
    ("音乐", "#1DB954", "music"),
    ("shop", "#FF5000", "shopping"),
    ("mall", "#FF5000", "shopping"),
    ("购物", "#FF5000", "shopping"),
    ("git", "#24292E", "development"),
    ("code", "#24292E", "development"),
    ("dev", "#24292E", "development"),
    ("开发", "#24292E", "development"),
    ("gpt", "#10A37F", "AI"),
    ("chat", "#10A37F", "AI"),
    ("智能", "#10A37F", "AI"),
    ("doc", "#0066FF", "documentation"),
    ("wiki", "#0066FF", "documentation"),
    ("文档", "#0066FF", "documentation"),
    ("bank", "#9B4400", "finance"),
    ("pay", "#9B4400", "finance"),
    ("finance", "#9B4400", "finance"),
    ("银行", "#9B4400", "finance"),
    ("game", "#7B2CBF", "games"),
    ("游戏", "#7B2CBF", "games"),
    ("learn", "#F4A300", "learning"),
    ("edu", "#F4A300", "learning"),
    ("course", "#F4A300", "learning"),
    ("学习", "#F4A300", "learning"),
    ("map", "#34A853", "maps"),
    ("地图", "#34A853", "maps"),
    ("cloud", "#4285F4", "cloud"),
    ("云", "#4285F4", "cloud"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorSuggestion {
    /// Uppercase `#RRGGBB`.
    pub color: String,
    pub reason: String,
    pub confidence: f32,
}

impl ColorSuggestion {
    fn new(color: &str, reason: String, confidence: f32) -> Self {
        Self {
            color: color.to_uppercase(),
            reason,
            confidence,
        }
    }
}

fn site_host(url: &str) -> String {
    let host = hostname(url).to_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

fn first_label(host: &str) -> &str {
    host.split('.').next().unwrap_or_default()
}

fn exact_domain(host: &str) -> Option<ColorSuggestion> {
    DOMAIN_COLORS
        .iter()
        .find(|(domain, _)| *domain == host)
        .map(|(domain, color)| {
            ColorSuggestion::new(color, format!("Brand color of {domain}"), EXACT_DOMAIN_CONFIDENCE)
        })
}

/// At most one keyword per label; every label is scanned.
fn domain_keywords(host: &str) -> Vec<ColorSuggestion> {
    host.split('.')
        .filter_map(|label| {
            KEYWORD_COLORS
                .iter()
                .find(|(keyword, _, _)| label.contains(keyword))
                .map(|(keyword, color, category)| {
                    ColorSuggestion::new(
                        color,
                        format!("Domain contains \"{keyword}\" ({category})"),
                        DOMAIN_KEYWORD_CONFIDENCE,
                    )
                })
        })
        .collect()
}

/// Every keyword found in the name contributes.
fn name_keywords(name: &str) -> Vec<ColorSuggestion> {
    let name = name.to_lowercase();
    KEYWORD_COLORS
        .iter()
        .filter(|(keyword, _, _)| name.contains(keyword))
        .map(|(keyword, color, category)| {
            ColorSuggestion::new(
                color,
                format!("Name contains \"{keyword}\" ({category})"),
                NAME_KEYWORD_CONFIDENCE,
            )
        })
        .collect()
}

/// Most common color among existing tiles whose site label overlaps ours.
fn sibling_color(host: &str, existing: &[Tile]) -> Option<ColorSuggestion> {
    let label = first_label(host);
    if label.is_empty() {
        return None;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    for tile in existing {
        let other_host = site_host(&tile.url);
        if other_host.is_empty() {
            continue;
        }
        let other = first_label(&other_host);
        if other.is_empty() || !(label.contains(other) || other.contains(label)) {
            continue;
        }
        let key = tile.color_key();
        if !counts.contains_key(&key) {
            first_seen.push(key.clone());
        }
        *counts.entry(key).or_insert(0) += 1;
    }

    // Ties resolve to the color seen first.
    let mut best: Option<(&String, usize)> = None;
    for color in &first_seen {
        let n = counts.get(color).copied().unwrap_or(0);
        if best.is_none_or(|(_, m)| n > m) {
            best = Some((color, n));
        }
    }
    best.map(|(color, n)| {
        ColorSuggestion::new(
            color,
            format!("Used by {n} similar tile(s)"),
            SIBLING_CONFIDENCE,
        )
    })
}

/// Up to [`MAX_SUGGESTIONS`] colors, highest confidence first, one entry per
/// color. An unparsable URL yields no suggestions.
pub fn suggest_colors(url: &str, name: &str, existing: &[Tile]) -> Vec<ColorSuggestion> {
    let host = site_host(url);
    if host.is_empty() {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    candidates.extend(exact_domain(&host));
    candidates.extend(domain_keywords(&host));
    candidates.extend(name_keywords(name));
    candidates.extend(sibling_color(&host, existing));

    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut picked: Vec<ColorSuggestion> = Vec::with_capacity(MAX_SUGGESTIONS);
    for candidate in candidates {
        if picked.iter().any(|p| p.color == candidate.color) {
            continue;
        }
        picked.push(candidate);
        if picked.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    picked
}
