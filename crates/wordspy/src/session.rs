//! Session identity: one string id per socket, minted on first contact
//! and reusable across reconnects via the `sessionId` query parameter.

use rand::Rng;

/// Alphabet for generated ids. The three Swedish letters are a
/// long-standing quirk of the id format that stored clients still carry.
const ID_CHARS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZÅÄÖabcdefghijklmnopqrstuvwxyz0123456789";

const ID_LEN: usize = 16;

/// Resolves the session id for a new connection: reuse the id offered in
/// the upgrade request's query string when it is non-empty and not the
/// literal `"null"` (what a browser sends for an unset local-storage
/// key), otherwise mint a fresh one.
pub fn resolve_session_id(query: Option<&str>) -> String {
    if let Some(query) = query {
        let offered = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "sessionId")
            .map(|(_, value)| value.into_owned());
        if let Some(id) = offered {
            if !id.is_empty() && id != "null" {
                tracing::info!(session_id = %id, "reusing offered session id");
                return id;
            }
        }
    }
    random_session_id()
}

/// A fresh `player:<16 chars>` id.
pub fn random_session_id() -> String {
    let chars: Vec<char> = ID_CHARS.chars().collect();
    let mut rng = rand::rng();
    let suffix: String = (0..ID_LEN)
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect();
    format!("player:{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_have_the_player_prefix() {
        let id = random_session_id();
        let suffix = id.strip_prefix("player:").expect("prefix");
        assert_eq!(suffix.chars().count(), ID_LEN);
        assert!(suffix.chars().all(|c| ID_CHARS.contains(c)));
    }

    #[test]
    fn test_generated_ids_are_unique_enough() {
        let a = random_session_id();
        let b = random_session_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_offered_id_is_reused() {
        let id = resolve_session_id(Some("sessionId=player:abc123"));
        assert_eq!(id, "player:abc123");
    }

    #[test]
    fn test_percent_encoded_id_is_decoded() {
        let id = resolve_session_id(Some("sessionId=player%3Aabc123"));
        assert_eq!(id, "player:abc123");
    }

    #[test]
    fn test_null_and_empty_ids_are_replaced() {
        let id = resolve_session_id(Some("sessionId=null"));
        assert!(id.starts_with("player:"));
        assert_ne!(id, "null");

        let id = resolve_session_id(Some("sessionId="));
        assert!(id.starts_with("player:"));

        let id = resolve_session_id(None);
        assert!(id.starts_with("player:"));
    }

    #[test]
    fn test_unrelated_query_params_are_ignored() {
        let id = resolve_session_id(Some("foo=bar&baz=1"));
        assert!(id.starts_with("player:"));
    }
}
