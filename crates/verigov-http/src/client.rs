//! Typed client for the VeriGov backend.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use verigov_core::models::{
    CheckOutcome, HealthStatus, JobState, NewTarget, Report, Target, TargetId, UserProfile,
};
use verigov_core::{Credentials, Registration, Result, SessionEventBus, TokenStore};

use crate::config::ClientConfig;
use crate::endpoints::{
    self, HEALTH, LOGIN, LoginRequest, ME, REGISTER, RegisterRequest, TARGETS, TokenResponse,
};
use crate::pipeline::RequestPipeline;
use crate::request::RequestDescriptor;
use crate::transport::HttpTransport;

/// Client for the VeriGov compliance backend.
///
/// Each client owns its transport, token store and event bus, so several
/// independently configured clients can live in one process. Cheap to clone.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use verigov_core::{ApiUrl, Credentials, MemoryTokenStore};
/// use verigov_http::{ClientConfig, VerigovClient};
///
/// # async fn example() -> Result<(), verigov_core::Error> {
/// let config = ClientConfig::new(ApiUrl::new("http://localhost:8000")?);
/// let client = VerigovClient::new(config, Arc::new(MemoryTokenStore::new()))?;
///
/// client.login(&Credentials::new("alice@example.com", "password123")).await?;
/// for target in client.list_targets().await? {
///     println!("{} {}", target.id, target.document);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VerigovClient {
    pipeline: RequestPipeline,
}

impl VerigovClient {
    /// Create a client with its own event bus.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        Self::with_events(config, store, SessionEventBus::new())
    }

    /// Create a client that publishes on an existing event bus.
    pub fn with_events(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        events: SessionEventBus,
    ) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            pipeline: RequestPipeline::new(transport, store, events),
        })
    }

    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    /// The bus on which session expiry is announced.
    pub fn events(&self) -> &SessionEventBus {
        self.pipeline.events()
    }

    /// True iff an access token is stored. Does not validate it.
    pub fn is_authenticated(&self) -> bool {
        self.pipeline.store().is_authenticated()
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Log in and store the issued tokens.
    #[instrument(skip_all, fields(email = %credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        info!("Logging in");

        let descriptor = RequestDescriptor::post(LOGIN).with_json(&LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        })?;

        let response: TokenResponse = self.pipeline.issue(&descriptor).await?;
        self.pipeline.store().set_tokens(response.into_pair())?;

        debug!("Session created successfully");
        Ok(())
    }

    /// Register a user and tenant, then store the issued tokens.
    #[instrument(skip_all, fields(email = %registration.credentials().email(), tenant = registration.tenant_name()))]
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        info!("Registering account");

        let credentials = registration.credentials();
        let descriptor = RequestDescriptor::post(REGISTER).with_json(&RegisterRequest {
            email: credentials.email(),
            password: credentials.password(),
            tenant_name: registration.tenant_name(),
        })?;

        let response: TokenResponse = self.pipeline.issue(&descriptor).await?;
        self.pipeline.store().set_tokens(response.into_pair())?;

        debug!("Account registered");
        Ok(())
    }

    /// Forget the stored tokens. No network call, no expiry event.
    pub fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.pipeline.store().clear_tokens()
    }

    /// Renew the session explicitly. See [`RefreshCoordinator::refresh`](crate::RefreshCoordinator::refresh).
    pub async fn refresh_session(&self) -> bool {
        self.pipeline.refresher().refresh().await
    }

    /// The authenticated user.
    pub async fn me(&self) -> Result<UserProfile> {
        self.pipeline.issue(&RequestDescriptor::get(ME)).await
    }

    // ========================================================================
    // Targets and reports
    // ========================================================================

    pub async fn list_targets(&self) -> Result<Vec<Target>> {
        self.pipeline.issue(&RequestDescriptor::get(TARGETS)).await
    }

    #[instrument(skip(self))]
    pub async fn create_target(&self, target: &NewTarget) -> Result<Target> {
        let descriptor = RequestDescriptor::post(TARGETS).with_json(target)?;
        self.pipeline.issue(&descriptor).await
    }

    /// Run a check synchronously. The backend stores a new report before
    /// responding.
    #[instrument(skip(self))]
    pub async fn run_check(&self, id: TargetId) -> Result<CheckOutcome> {
        let descriptor = RequestDescriptor::post(endpoints::target_check(id));
        let outcome: Option<CheckOutcome> = self.pipeline.issue(&descriptor).await?;
        Ok(outcome.unwrap_or_default())
    }

    /// Ask the backend to queue the check. Backends with queuing disabled
    /// run it synchronously instead.
    #[instrument(skip(self))]
    pub async fn run_check_async(&self, id: TargetId) -> Result<CheckOutcome> {
        let path = format!("{}?async_mode=true", endpoints::target_check(id));
        let outcome: Option<CheckOutcome> =
            self.pipeline.issue(&RequestDescriptor::post(path)).await?;
        Ok(outcome.unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn latest_report(&self, id: TargetId) -> Result<Report> {
        self.pipeline
            .issue(&RequestDescriptor::get(endpoints::latest_report(id)))
            .await
    }

    /// State of a queued check.
    #[instrument(skip(self))]
    pub async fn job(&self, job_id: &str) -> Result<JobState> {
        let path = endpoints::job(job_id)?;
        self.pipeline.issue(&RequestDescriptor::get(path)).await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.pipeline.issue(&RequestDescriptor::get(HEALTH)).await
    }
}
