use crate::{
    Res,
    cli::Context,
    types::{TimeRange, TopItemType},
};

pub async fn get_top(
    ctx: &Context,
    item_type: TopItemType,
    limit: u32,
    offset: u32,
    time_range: TimeRange,
) -> Res<()> {
    let data = ctx
        .client
        .get_top_items(&ctx.access_token, item_type, limit, offset, time_range)
        .await?;

    ctx.emit(data).await
}
