use std::path::Path;

use crate::{Error, Res, cli::Context, info, utils};

/// Audio analysis for one track, or for every ID in `file` when `track_id`
/// is `-`.
///
/// In file mode each ID is requested on its own and written to its own
/// target (see [`utils::OutputTarget::for_id`]). The first failing ID stops
/// the command.
pub async fn analyze_track(ctx: &Context, track_id: &str, file: Option<&Path>) -> Res<()> {
    if track_id != "-" {
        let data = ctx
            .client
            .get_audio_analysis(&ctx.access_token, track_id)
            .await?;
        return ctx.emit(data).await;
    }

    let file = file.ok_or_else(|| {
        Error::Input("`-` needs --file with one track ID per line.".to_string())
    })?;
    let ids = utils::read_id_file(file).await?;
    info!("Analyzing {} tracks from {}", ids.len(), file.display());

    for id in &ids {
        let data = ctx.client.get_audio_analysis(&ctx.access_token, id).await?;
        ctx.emit_to(data, &ctx.output.for_id(id)).await?;
    }

    Ok(())
}
