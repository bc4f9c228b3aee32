// Authentication endpoints. `/login` takes an OAuth2 password form.
impl OrchestraClient {
    fn login_request(&self, credentials: &LoginCredentials) -> reqwest::RequestBuilder {
        self.post("/login").form(&[
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ])
    }

    async fn post_login(&self, credentials: &LoginCredentials) -> Result<String, ApiError> {
        let request = self.login_request(credentials);
        let body: LoginResponse = self.send_json(request, "Login failed").await?;
        if body.access_token.trim().is_empty() {
            return Err(ApiError::Decode("empty access token".to_string()));
        }
        Ok(body.access_token)
    }

    async fn get_current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let request = self.get("/user").bearer_auth(token);
        match self.send_json(request, "Session expired").await {
            Err(ApiError::Http { status, .. }) if status == 401 || status == 403 => {
                Err(ApiError::SessionInvalid)
            }
            other => other,
        }
    }

    async fn post_user(&self, request: &RegistrationRequest) -> Result<UserProfile, ApiError> {
        let request = self.post("/user").json(request);
        self.send_json(request, "Registration failed").await
    }
}
