use std::path::Path;

use crate::{
    Error, Res,
    cli::Context,
    info,
    types::{Lookup, Resource},
    utils,
};

pub async fn get_artists(ctx: &Context, ids: &[String]) -> Res<()> {
    lookup_and_emit(ctx, Resource::Artists, ids).await
}

pub async fn get_tracks(ctx: &Context, ids: &[String]) -> Res<()> {
    lookup_and_emit(ctx, Resource::Tracks, ids).await
}

/// Audio features for the given IDs, or for every ID in `file` when the only
/// ID is `-`. File mode issues one single-ID request per line and halts on
/// the first failure.
pub async fn get_audio_features(ctx: &Context, ids: &[String], file: Option<&Path>) -> Res<()> {
    if ids.first().map(String::as_str) != Some("-") {
        return lookup_and_emit(ctx, Resource::AudioFeatures, ids).await;
    }

    let file = file.ok_or_else(|| {
        Error::Input("`--id -` needs --file with one track ID per line.".to_string())
    })?;
    let file_ids = utils::read_id_file(file).await?;
    info!("Fetching audio features for {} tracks from {}", file_ids.len(), file.display());

    for id in file_ids {
        let lookup = ctx
            .client
            .lookup(&ctx.access_token, Resource::AudioFeatures, std::slice::from_ref(&id))
            .await?;
        ctx.emit_to(lookup.into_payload(Resource::AudioFeatures), &ctx.output.for_id(&id))
            .await?;
    }

    Ok(())
}

async fn lookup_and_emit(ctx: &Context, resource: Resource, ids: &[String]) -> Res<()> {
    let lookup = ctx.client.lookup(&ctx.access_token, resource, ids).await?;
    if let Lookup::Batch(items) = &lookup {
        log::debug!("{} {} returned {} objects", ids.len(), resource.path(), items.len());
    }
    ctx.emit(lookup.into_payload(resource)).await
}
