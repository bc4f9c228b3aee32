// Playlist and favorite endpoints. All of them require a bearer token.
impl OrchestraClient {
    async fn get_user_playlists(
        &self,
        token: &str,
        user_id: UserId,
    ) -> Result<Vec<Playlist>, ApiError> {
        let request = self
            .get(&format!("/users/{user_id}/playlists"))
            .bearer_auth(token);
        let records: Vec<PlaylistRecord> = self
            .send_json(request, "Unable to load playlists")
            .await?;
        Ok(records
            .into_iter()
            .map(|record| record.into_playlist(user_id))
            .collect())
    }

    fn create_playlist_request(&self, token: &str, name: &str) -> reqwest::RequestBuilder {
        self.post("/playlist")
            .bearer_auth(token)
            .json(&CreatePlaylistBody {
                playlist_name: name,
            })
    }

    async fn post_playlist(
        &self,
        token: &str,
        owner_id: UserId,
        name: &str,
    ) -> Result<Playlist, ApiError> {
        let request = self.create_playlist_request(token, name);
        let record: PlaylistRecord = self
            .send_json(request, "Could not create the playlist")
            .await?;
        Ok(record.into_playlist(owner_id))
    }

    fn playlist_track_request(
        &self,
        token: &str,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> reqwest::RequestBuilder {
        self.post("/playlistTrack")
            .bearer_auth(token)
            .json(&PlaylistTrackBody {
                playlist_id,
                track_id,
            })
    }

    async fn post_playlist_track(
        &self,
        token: &str,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<(), ApiError> {
        let request = self.playlist_track_request(token, playlist_id, track_id);
        self.send(request, "Could not add the track to the playlist")
            .await?;
        Ok(())
    }

    async fn post_favorite(&self, token: &str, track_id: TrackId) -> Result<(), ApiError> {
        let request = self
            .post("/trackUserFavorite")
            .bearer_auth(token)
            .json(&FavoriteBody { track_id });
        self.send(request, "Could not add the favorite").await?;
        Ok(())
    }

    async fn delete_favorite(&self, token: &str, track_id: TrackId) -> Result<(), ApiError> {
        let request = self
            .delete(&format!("/trackUserFavorite/{track_id}"))
            .bearer_auth(token);
        self.send(request, "Could not remove the favorite").await?;
        Ok(())
    }
}
