use serde_json::Value;

use crate::{
    Error, Res,
    spotify::SpotifyClient,
    types::{Lookup, Resource},
};

impl SpotifyClient {
    /// Looks up one or several catalog objects of the same kind.
    ///
    /// One ID goes to `/{resource}/{id}` and comes back as
    /// [`Lookup::Single`]. Two or more go to `/{resource}?ids=a,b` and the
    /// wrapped array comes back as [`Lookup::Batch`], in request order.
    ///
    /// # Errors
    ///
    /// [`Error::Input`] for an empty ID list, [`Error::Api`] for non-200
    /// answers and [`Error::UnexpectedResponse`] when a batch body has no array
    /// under the resource's key.
    pub async fn lookup(&self, token: &str, resource: Resource, ids: &[String]) -> Res<Lookup> {
        match ids {
            [] => Err(Error::Input(format!(
                "at least one {} ID is required",
                resource.path()
            ))),
            [id] => Ok(Lookup::Single(self.get_one(token, resource, id).await?)),
            _ => {
                let mut value = self.get_several(token, resource, ids).await?;
                match value.get_mut(resource.batch_key()).map(Value::take) {
                    Some(Value::Array(items)) => Ok(Lookup::Batch(items)),
                    _ => Err(Error::UnexpectedResponse(format!(
                        "batch response has no `{}` array",
                        resource.batch_key()
                    ))),
                }
            }
        }
    }

    async fn get_one(&self, token: &str, resource: Resource, id: &str) -> Res<Value> {
        self.get_json(token, &[resource.path(), id], &[]).await
    }

    async fn get_several(&self, token: &str, resource: Resource, ids: &[String]) -> Res<Value> {
        self.get_json(token, &[resource.path()], &[("ids", ids.join(","))])
            .await
    }

    /// Catalog information for a single track.
    pub async fn get_track(&self, token: &str, track_id: &str) -> Res<Value> {
        self.get_one(token, Resource::Tracks, track_id).await
    }

    /// Catalog information for several tracks, `{ "tracks": [...] }`.
    pub async fn get_several_tracks(&self, token: &str, track_ids: &[String]) -> Res<Value> {
        self.get_several(token, Resource::Tracks, track_ids).await
    }

    pub async fn get_artist(&self, token: &str, artist_id: &str) -> Res<Value> {
        self.get_one(token, Resource::Artists, artist_id).await
    }

    pub async fn get_several_artists(&self, token: &str, artist_ids: &[String]) -> Res<Value> {
        self.get_several(token, Resource::Artists, artist_ids).await
    }

    /// Low-level audio analysis of a track: structure, rhythm, pitch, timbre.
    pub async fn get_audio_analysis(&self, token: &str, track_id: &str) -> Res<Value> {
        self.get_json(token, &["audio-analysis", track_id], &[])
            .await
    }

    pub async fn get_audio_features(&self, token: &str, track_id: &str) -> Res<Value> {
        self.get_one(token, Resource::AudioFeatures, track_id).await
    }

    pub async fn get_several_audio_features(&self, token: &str, track_ids: &[String]) -> Res<Value> {
        self.get_several(token, Resource::AudioFeatures, track_ids)
            .await
    }
}
