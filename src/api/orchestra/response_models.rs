#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct CreatePlaylistBody<'a> {
    playlist_name: &'a str,
}

#[derive(Debug, Serialize)]
struct PlaylistTrackBody {
    playlist_id: PlaylistId,
    track_id: TrackId,
}

#[derive(Debug, Serialize)]
struct FavoriteBody {
    track_id: TrackId,
}
