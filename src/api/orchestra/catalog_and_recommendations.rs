const BEHAVIORAL_PATH: &str = "/users/gru_recommendations/detailed";
const CONTENT_BASED_PATH: &str = "/users/tf-idf_recommendations";

impl OrchestraClient {
    async fn get_catalog_tracks(&self, limit: u32) -> Result<Vec<Track>, ApiError> {
        let request = self.get("/viewTrack").query(&[("limit", limit)]);
        let payload: TrackListPayload = self
            .send_json(request, "Unable to load the catalog")
            .await?;
        Ok(payload.into_tracks())
    }

    async fn get_recommendations(
        &self,
        path: &str,
        token: &str,
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        let request = self.get(path).bearer_auth(token).query(&[("limit", limit)]);
        let payload: TrackListPayload = self
            .send_json(request, "Unable to load recommendations")
            .await?;
        Ok(payload.into_tracks())
    }
}
