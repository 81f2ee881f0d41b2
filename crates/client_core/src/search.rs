use regex::Regex;
use shared::protocol::SearchFilter;

/// Field a bare search string is matched against.
pub const DEFAULT_SEARCH_FIELD: &str = "name";

/// Routing metadata for the view a search is rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuInfo {
    pub id: String,
}

/// Capture groups of a matched route, group 0 being the whole path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    groups: Vec<Option<String>>,
}

impl RouteMatch {
    pub fn new(groups: Vec<Option<String>>) -> Self {
        Self { groups }
    }

    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|group| group.as_deref())
    }
}

/// Matches `<page>/search/<encoded query>` menu paths.
#[derive(Debug, Clone)]
pub struct SearchRoute {
    pattern: Regex,
}

impl SearchRoute {
    pub fn for_page(page_name: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^{}/search/(.*)$", regex::escape(page_name)))?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, path: &str) -> Option<RouteMatch> {
        let captures = self.pattern.captures(path)?;
        Some(RouteMatch::new(
            captures
                .iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect(),
        ))
    }

    /// Menu path that [`SearchRoute::matches`] maps back to `query`.
    pub fn path_for(page_name: &str, query: &str) -> String {
        format!("{page_name}/search/{}", urlencoding::encode(query))
    }
}

/// Percent-decodes a route capture. `+` is left alone; invalid UTF-8 is
/// replaced rather than rejected.
pub fn decode_query(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned(),
    }
}

/// `k=v&k2=v2` becomes a field map; any other non-empty text is a
/// search on [`DEFAULT_SEARCH_FIELD`].
pub fn search_string_to_object(query: &str) -> SearchFilter {
    let mut filter = SearchFilter::new();
    let query = query.trim();
    if query.is_empty() {
        return filter;
    }

    let pairs: Option<Vec<(&str, &str)>> = query
        .split('&')
        .map(|segment| {
            segment
                .split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
                .filter(|(key, _)| !key.is_empty())
        })
        .collect();

    match pairs {
        Some(pairs) => {
            for (key, value) in pairs {
                filter.insert(key.to_string(), value.to_string());
            }
        }
        None => {
            filter.insert(DEFAULT_SEARCH_FIELD.to_string(), query.to_string());
        }
    }
    filter
}
