use chrono::NaiveDateTime;

use crate::{
    Res,
    cli::Context,
    types::Direction,
    utils::{self, TimeZoneArg},
};

/// Fetches listening history `before` or `after` a wall-clock time
/// interpreted in `time_zone`.
pub async fn get_recently_played(
    ctx: &Context,
    direction: Direction,
    timestamp: NaiveDateTime,
    limit: u32,
    time_zone: TimeZoneArg,
) -> Res<()> {
    let timestamp_ms = utils::to_unix_millis(timestamp, time_zone)?;
    log::debug!("recently played {} {}", direction.as_query(), timestamp_ms);

    let data = ctx
        .client
        .get_recently_played(&ctx.access_token, direction, timestamp_ms, limit)
        .await?;

    ctx.emit(data).await
}
