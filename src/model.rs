//! Records exchanged with the upstream service and re-emitted to clients.
//!
//! Decoding is forgiving about absence: a missing or `null` number becomes
//! `0`, a missing or `null` string becomes `""`, so clients never see `null`.
//! Field names are matched without regard to case (`votes`, `Votes` and
//! `VOTES` are one field); output always uses lower case. If an object
//! carries the same name twice in different cases, one of them wins.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A content item as served by the upstream `/posts` resource.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Tag data as one string, exactly as the upstream stores it.
    pub tags: String,
    pub link: String,
    pub votes: i64,
}

/// A structured recommendation.
///
/// `score` stays a string end to end: the upstream emits it as text and may
/// put non-numeric content in it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Recommendation {
    pub title: String,
    pub score: String,
}

// Wire shapes, decoded after every key has been lower-cased.

#[derive(Deserialize)]
struct PostFields {
    #[serde(default, deserialize_with = "null_as_default")]
    id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: String,
    #[serde(default, deserialize_with = "null_as_default")]
    link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    votes: i64,
}

#[derive(Deserialize)]
struct RecommendationFields {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    score: String,
}

impl TryFrom<Map<String, Value>> for Post {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let PostFields { id, title, content, tags, link, votes } = lowercase_keys(object)?;
        Ok(Self { id, title, content, tags, link, votes })
    }
}

impl TryFrom<Map<String, Value>> for Recommendation {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let RecommendationFields { title, score } = lowercase_keys(object)?;
        Ok(Self { title, score })
    }
}

fn lowercase_keys<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T, serde_json::Error> {
    let lowered = object.into_iter().map(|(k, v)| (k.to_ascii_lowercase(), v)).collect();
    serde_json::from_value(Value::Object(lowered))
}

/// Positively voted posts, most votes first.
///
/// Posts with the same vote count keep their upstream order (`sort_by` is
/// stable). Nothing is truncated.
pub fn top_posts(posts: Vec<Post>) -> Vec<Post> {
    let mut top: Vec<Post> = posts.into_iter().filter(|p| p.votes > 0).collect();
    top.sort_by(|a, b| b.votes.cmp(&a.votes));
    top
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn post(id: i64, votes: i64) -> Post {
        Post { id, title: format!("post {id}"), votes, ..Post::default() }
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn missing_and_null_fields_default() {
        let p: Post = serde_json::from_value(json!({ "id": 3, "title": null, "votes": null })).unwrap();
        assert_eq!(p, Post { id: 3, ..Post::default() });

        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(
            out,
            json!({ "id": 3, "title": "", "content": "", "tags": "", "link": "", "votes": 0 })
        );
    }

    #[test]
    fn accepts_pascal_case_names() {
        let p: Post = serde_json::from_value(json!({
            "Id": 9, "Title": "T", "Content": "C", "Tags": "rust,web", "Votes": -2
        }))
        .unwrap();
        assert_eq!(p.id, 9);
        assert_eq!(p.tags, "rust,web");
        assert_eq!(p.votes, -2);
    }

    #[test]
    fn field_names_match_in_any_case() {
        let p: Post = serde_json::from_value(json!({ "ID": 1, "VOTES": 5, "title": "A" })).unwrap();
        assert_eq!((p.id, p.votes, p.title.as_str()), (1, 5, "A"));

        let q: Post =
            serde_json::from_value(json!({ "iD": 2, "vOtEs": 3, "TiTle": "B", "LINK": null })).unwrap();
        assert_eq!((q.id, q.votes, q.title.as_str(), q.link.as_str()), (2, 3, "B", ""));

        assert_eq!(ids(&top_posts(vec![p, q])), vec![1, 2]);

        let r: Recommendation =
            serde_json::from_value(json!({ "TITLE": "C", "SCORE": "0.5" })).unwrap();
        assert_eq!(r, Recommendation { title: "C".into(), score: "0.5".into() });
    }

    #[test]
    fn non_objects_and_mistyped_fields_are_rejected() {
        assert!(serde_json::from_value::<Post>(json!(7)).is_err());
        assert!(serde_json::from_value::<Post>(json!({ "ID": "x" })).is_err());
        assert!(serde_json::from_value::<Recommendation>(json!("title")).is_err());
    }

    #[test]
    fn round_trip_preserves_values() {
        let upstream = json!({
            "id": 42, "title": "Ünïcode ✓", "content": "body\nwith lines",
            "tags": "['a', 'b']", "link": "https://x.example/42", "votes": 17
        });
        let p: Post = serde_json::from_value(upstream.clone()).unwrap();
        assert_eq!(serde_json::to_value(&p).unwrap(), upstream);
    }

    #[test]
    fn ignores_unknown_fields() {
        let p: Post = serde_json::from_value(json!({ "id": 1, "author": "x", "votes": 2 })).unwrap();
        assert_eq!(p.votes, 2);
    }

    #[test]
    fn recommendation_score_stays_text() {
        let r: Recommendation =
            serde_json::from_value(json!({ "title": "A", "score": "0.930000" })).unwrap();
        assert_eq!(r.score, "0.930000");
        let r: Recommendation =
            serde_json::from_value(json!({ "Title": "B", "Score": "n/a" })).unwrap();
        assert_eq!(r.score, "n/a");
        assert!(serde_json::from_value::<Recommendation>(json!({ "title": "C", "score": 0.5 })).is_err());
    }

    #[test]
    fn top_posts_filters_and_orders_stably() {
        let posts = vec![post(1, 5), post(2, 0), post(3, 9), post(4, 5)];
        assert_eq!(ids(&top_posts(posts)), vec![3, 1, 4]);
    }

    #[test]
    fn top_posts_drops_non_positive() {
        let posts = vec![post(1, -1), post(2, 0), post(3, 1), post(4, -7), post(5, 2)];
        let top = top_posts(posts);
        assert_eq!(ids(&top), vec![5, 3]);
        assert!(top.iter().all(|p| p.votes > 0));
    }

    #[test]
    fn top_posts_on_empty_or_all_negative() {
        assert!(top_posts(Vec::new()).is_empty());
        assert!(top_posts(vec![post(1, 0), post(2, -3)]).is_empty());
    }

    #[test]
    fn top_posts_keeps_every_positive_post() {
        let posts: Vec<Post> = (0..50).map(|i| post(i, (i * 7919) % 13 - 4)).collect();
        let positive = posts.iter().filter(|p| p.votes > 0).count();
        let top = top_posts(posts.clone());

        assert_eq!(top.len(), positive);
        assert!(top.windows(2).all(|w| w[0].votes >= w[1].votes));
        for w in top.windows(2).filter(|w| w[0].votes == w[1].votes) {
            assert!(w[0].id < w[1].id, "ties must keep upstream order");
        }
    }
}
