/// An entry as it came out of the feed parser. Every field is optional and
/// none of them has been cleaned up yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub pub_date: Option<String>,
    pub creator: Option<String>,
    pub content: Option<String>,
    pub content_snippet: Option<String>,
    pub iso_date: Option<String>,
}
