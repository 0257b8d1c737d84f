use serde_json::Value;

use crate::{
    Res,
    spotify::SpotifyClient,
    types::{Direction, TimeRange, TopItemType},
};

impl SpotifyClient {
    /// The current user's top artists or tracks by calculated affinity.
    ///
    /// Requires the `user-top-read` scope. `limit` is 0..=50 and `offset`
    /// pages through the result together with it.
    pub async fn get_top_items(
        &self,
        token: &str,
        item_type: TopItemType,
        limit: u32,
        offset: u32,
        time_range: TimeRange,
    ) -> Res<Value> {
        self.get_json(
            token,
            &["me", "top", item_type.as_str()],
            &[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("time_range", time_range.as_query().to_string()),
            ],
        )
        .await
    }

    /// Tracks from the current user's listening history `before` or `after`
    /// a Unix timestamp in milliseconds. Podcast episodes are not included.
    pub async fn get_recently_played(
        &self,
        token: &str,
        direction: Direction,
        timestamp_ms: i64,
        limit: u32,
    ) -> Res<Value> {
        self.get_json(
            token,
            &["me", "player", "recently-played"],
            &[
                (direction.as_query(), timestamp_ms.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}
