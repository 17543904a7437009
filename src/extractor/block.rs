/// Substrings that together identify a WeChat anti-automation challenge page.
///
/// Both must be present. Articles that merely talk about "安全验证" will trip
/// this as well; there is no cheap way to tell them apart from the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMarkers {
    pub verification: String,
    pub security: String,
}

impl Default for BlockMarkers {
    fn default() -> Self {
        Self {
            verification: "验证".to_string(),
            security: "安全".to_string(),
        }
    }
}

impl BlockMarkers {
    /// Checked against the raw response text, whatever the HTTP status was.
    pub fn is_soft_blocked(&self, raw: &str) -> bool {
        raw.contains(&self.verification) && raw.contains(&self.security)
    }
}
