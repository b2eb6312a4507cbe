use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{TweetId, UserId};

/// A tweet as returned by the API.
///
/// Only the fields needed for harvesting are typed. Everything else is kept
/// in `fields` so the record serializes back to the original JSON.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Tweet {
    pub id: TweetId,
    pub user: TweetAuthor,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// The `user` object embedded in a tweet.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct TweetAuthor {
    pub id: UserId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A user account as returned by the API.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub screen_name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Tweet {
    pub fn author(&self) -> UserId {
        self.user.id
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn untyped_fields_survive_round_trip() {
        let raw = json!({
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "id": 1050118621198921728u64,
            "id_str": "1050118621198921728",
            "full_text": "To make room for more expression...",
            "user": {
                "id": 6253282,
                "screen_name": "TwitterAPI",
                "verified": true
            },
            "retweet_count": 161
        });

        let tweet: Tweet = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(TweetId::new(1050118621198921728), tweet.id);
        assert_eq!(UserId::new(6253282), tweet.author());
        assert_eq!(Some(&json!(161)), tweet.fields.get("retweet_count"));

        assert_eq!(raw, serde_json::to_value(&tweet).unwrap());
    }

    #[test]
    fn user_record() {
        let raw = json!({
            "id": 783214,
            "screen_name": "Twitter",
            "protected": false,
            "followers_count": 56000000
        });

        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(UserId::new(783214), user.id);
        assert_eq!("Twitter", user.screen_name);
        assert_eq!(raw, serde_json::to_value(&user).unwrap());
    }
}
