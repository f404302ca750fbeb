//! PaymentOrchestrator.
//!
//! One orchestrator backs one view of the payment page. It is responsible for:
//! - Holding the form the customer fills in and the derived processing fee
//! - Validating the form and publishing field-level messages
//! - Persisting an order per submission, normalized to the base currency
//! - Card path: creating a payment intent and handing back the checkout URL
//! - Manual path: opening the confirmation that awaits proof of payment
//! - Copy-to-clipboard acknowledgements for payee handles
//!
//! At most one submission runs at a time. The in-flight flag is taken with a
//! compare-exchange before the first suspension point and released by a drop
//! guard, so a second trigger while one is running returns
//! [`SubmissionOutcome::Busy`] and a dropped future never leaves the page
//! stuck in the loading state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use url::Url;
use uuid::Uuid;
use villa_pay_sdk::objects::{CreatePaymentIntent, NewOrder, OrderStatus, PaymentMethod};

use crate::channel::TransferChannel;
use crate::clipboard::CopyFlags;
use crate::config::CheckoutConfig;
use crate::country::CountryCodeDetector;
use crate::currency::CurrencyError;
use crate::error::{CheckoutError, ClipboardError, GatewayError, GatewayFailureReason};
use crate::form::{self, PaymentForm, ValidationErrors};
use crate::ports::{Clipboard, OrderStore, PaymentIntents};
use crate::pricing::{self, PriceBreakdown};
use crate::session::SessionAccessor;

pub const MANUAL_METHOD_REQUIRED_MESSAGE: &str = "Please choose a manual payment method";

/// External collaborators a submission talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub session: SessionAccessor,
    pub orders: Arc<dyn OrderStore>,
    pub intents: Arc<dyn PaymentIntents>,
}

/// Result of one submit trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Another submission is still in flight; nothing was done.
    Busy,
    /// The form did not validate; no collaborator was called.
    Invalid(ValidationErrors),
    /// Navigate to the hosted checkout page.
    Redirect(Url),
    /// The order awaits a manual transfer and its proof of payment.
    AwaitingConfirmation(ManualConfirmation),
    /// The submission failed with this user-facing message.
    Failed(String),
}

/// Display projection of the service being paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub title: String,
    /// Final amount formatted in the selected currency.
    pub price: String,
    /// Final amount formatted in the secondary currency.
    pub price_secondary: String,
    pub currency: String,
}

/// What the confirmation modal shows after a manual order was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualConfirmation {
    pub order_id: Uuid,
    pub service: ServiceSummary,
    /// Amount plus fee, in the selected currency.
    pub total_amount: Decimal,
    /// Amount before fee, in the selected currency.
    pub base_amount: Decimal,
    pub processing_fee: Decimal,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_whatsapp: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Default)]
struct ViewState {
    errors: ValidationErrors,
    error_message: Option<String>,
    confirmation: Option<ManualConfirmation>,
    current_order_id: Option<Uuid>,
}

/// Holds the in-flight flag for the lifetime of one submission.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PaymentOrchestrator {
    config: Arc<CheckoutConfig>,
    collaborators: Collaborators,
    form: RwLock<PaymentForm>,
    view: RwLock<ViewState>,
    loading: AtomicBool,
    copied: CopyFlags,
    clipboard: Option<Arc<dyn Clipboard>>,
    detector: Option<CountryCodeDetector>,
}

impl PaymentOrchestrator {
    pub fn new(config: Arc<CheckoutConfig>, collaborators: Collaborators) -> Self {
        let form = PaymentForm::new(&config);
        Self {
            config,
            collaborators,
            form: RwLock::new(form),
            view: RwLock::new(ViewState::default()),
            loading: AtomicBool::new(false),
            copied: CopyFlags::new(),
            clipboard: None,
            detector: None,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_country_detection(mut self, detector: CountryCodeDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    // Form input

    /// Set the amount from raw input text. Unparseable input becomes zero.
    pub async fn set_amount_input(&self, input: &str) {
        self.form.write().await.amount = form::parse_amount(input);
    }

    pub async fn set_amount(&self, amount: Decimal) {
        self.form.write().await.amount = amount;
    }

    /// Select the currency the customer pays in. Only configured currencies
    /// are accepted.
    pub async fn set_currency(&self, code: &str) -> Result<(), CurrencyError> {
        let currency = self.config.currencies.get(code)?;
        self.form.write().await.currency = currency.code.clone();
        Ok(())
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        self.form.write().await.description = description.into();
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        self.form.write().await.name = name.into();
    }

    pub async fn set_email(&self, email: impl Into<String>) {
        self.form.write().await.email = email.into();
    }

    pub async fn set_calling_code(&self, code: impl Into<String>) {
        self.form.write().await.calling_code = code.into();
    }

    /// Set the WhatsApp number from raw input text, keeping digits only.
    pub async fn set_phone_input(&self, input: &str) {
        self.form.write().await.phone = form::strip_non_digits(input);
    }

    /// Switch the active payment method tab.
    pub async fn select_method(&self, method: PaymentMethod) {
        self.form.write().await.method = method;
    }

    // Derived state

    pub async fn form(&self) -> PaymentForm {
        self.form.read().await.clone()
    }

    /// Processing fee for the current amount and method.
    pub async fn surcharge(&self) -> Result<Decimal, CurrencyError> {
        let form = self.form.read().await;
        pricing::surcharge(form.method, form.amount)
    }

    pub async fn price_breakdown(&self) -> Result<PriceBreakdown, CurrencyError> {
        let form = self.form.read().await;
        PriceBreakdown::new(form.method, form.amount, &form.currency, &self.config.currencies)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn errors(&self) -> ValidationErrors {
        self.view.read().await.errors.clone()
    }

    pub async fn error_message(&self) -> Option<String> {
        self.view.read().await.error_message.clone()
    }

    pub async fn confirmation(&self) -> Option<ManualConfirmation> {
        self.view.read().await.confirmation.clone()
    }

    pub async fn current_order_id(&self) -> Option<Uuid> {
        self.view.read().await.current_order_id
    }

    pub fn is_copied(&self, channel: TransferChannel) -> bool {
        self.copied.is_raised(channel)
    }

    // Operations

    /// Validate the current form, replacing the published field messages.
    pub async fn validate(&self) -> bool {
        let form = self.form.read().await.clone();
        self.record_validation(&form).await.is_empty()
    }

    async fn record_validation(&self, form: &PaymentForm) -> ValidationErrors {
        let errors = form::validate(form);
        self.view.write().await.errors = errors.clone();
        errors
    }

    /// Preselect the calling code for the customer's location.
    ///
    /// Without a detector the current calling code is kept.
    pub async fn detect_country_code(&self) -> String {
        let Some(detector) = &self.detector else {
            return self.form.read().await.calling_code.clone();
        };
        let code = detector.detect().await;
        self.form.write().await.calling_code = code.clone();
        code
    }

    /// Submit through whichever path the active tab belongs to.
    pub async fn submit(&self) -> SubmissionOutcome {
        let method = self.form.read().await.method;
        match method {
            PaymentMethod::Card => self.submit_gateway_payment().await,
            _ => self.submit_manual_payment().await,
        }
    }

    /// Card path: store a `pending` order and obtain the hosted checkout URL.
    pub async fn submit_gateway_payment(&self) -> SubmissionOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.loading) else {
            debug!("Submission already in flight");
            return SubmissionOutcome::Busy;
        };
        let form = self.form.read().await.clone();

        let errors = self.record_validation(&form).await;
        if !errors.is_empty() {
            return SubmissionOutcome::Invalid(errors);
        }
        self.view.write().await.error_message = None;

        match self.create_checkout(&form).await {
            Ok(url) => {
                info!(host = url.host_str().unwrap_or_default(), "Redirecting to hosted checkout");
                SubmissionOutcome::Redirect(url)
            }
            Err(e) => {
                error!(error = %e, "Card payment failed");
                self.fail(e.gateway_path_message()).await
            }
        }
    }

    async fn create_checkout(&self, form: &PaymentForm) -> Result<Url, CheckoutError> {
        let method = PaymentMethod::Card;
        let total = pricing::total_with_surcharge(method, form.amount)?;

        let order_id = self.store_order(form, total, OrderStatus::Pending, method).await?;
        self.view.write().await.current_order_id = Some(order_id);

        let request = CreatePaymentIntent {
            amount: self.config.currencies.to_minor_units(total, &form.currency)?,
            currency: form.currency.to_lowercase(),
            description: self.title_for(form),
            order_id,
            email: non_empty(&form.email),
            name: non_empty(&form.name),
        };
        let reply = self.collaborators.intents.create_payment_intent(request).await?;

        if let Some(message) = reply.error {
            return Err(GatewayError::from_upstream(message).into());
        }
        let Some(url) = reply.url.filter(|url| !url.trim().is_empty()) else {
            return Err(GatewayError::no_response().into());
        };
        Url::parse(&url).map_err(|e| {
            CheckoutError::from(GatewayError::new(
                GatewayFailureReason::Rejected,
                format!("Payment service returned an invalid checkout URL: {e}"),
            ))
        })
    }

    /// Manual path: store a `pending_manual_review` order and open the
    /// confirmation for the active transfer channel.
    pub async fn submit_manual_payment(&self) -> SubmissionOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.loading) else {
            debug!("Submission already in flight");
            return SubmissionOutcome::Busy;
        };
        let form = self.form.read().await.clone();

        let errors = self.record_validation(&form).await;
        if !errors.is_empty() {
            return SubmissionOutcome::Invalid(errors);
        }
        self.view.write().await.error_message = None;

        let Some(channel) = TransferChannel::from_method(form.method) else {
            warn!("Manual submission with the card tab active");
            return self.fail(MANUAL_METHOD_REQUIRED_MESSAGE.to_string()).await;
        };

        match self.open_manual_order(&form, channel).await {
            Ok(confirmation) => {
                info!(
                    order_id = %confirmation.order_id,
                    method = %confirmation.payment_method,
                    "Awaiting manual payment"
                );
                let mut view = self.view.write().await;
                view.current_order_id = Some(confirmation.order_id);
                view.confirmation = Some(confirmation.clone());
                SubmissionOutcome::AwaitingConfirmation(confirmation)
            }
            Err(e) => {
                error!(error = %e, method = %channel, "Manual payment failed");
                self.fail(e.manual_path_message()).await
            }
        }
    }

    async fn open_manual_order(
        &self,
        form: &PaymentForm,
        channel: TransferChannel,
    ) -> Result<ManualConfirmation, CheckoutError> {
        let method = channel.method();
        let fee = pricing::surcharge(method, form.amount)?;
        let total = pricing::total_with_surcharge(method, form.amount)?;

        let order_id = self
            .store_order(form, total, OrderStatus::PendingManualReview, method)
            .await?;

        let table = &self.config.currencies;
        let secondary = &self.config.secondary_currency;
        let service = ServiceSummary {
            title: self.title_for(form),
            price: table.format(total, &form.currency),
            price_secondary: table.format(table.convert(total, &form.currency, secondary)?, secondary),
            currency: form.currency.clone(),
        };

        Ok(ManualConfirmation {
            order_id,
            service,
            total_amount: total,
            base_amount: form.amount,
            processing_fee: fee,
            customer_name: form.name.trim().to_string(),
            customer_email: form.email.trim().to_string(),
            customer_whatsapp: form.customer_whatsapp(),
            payment_method: method,
        })
    }

    /// Persist one order whose total is normalized to the base currency.
    async fn store_order(
        &self,
        form: &PaymentForm,
        total: Decimal,
        status: OrderStatus,
        method: PaymentMethod,
    ) -> Result<Uuid, CheckoutError> {
        let user = self.collaborators.session.current_user().await;
        let table = &self.config.currencies;
        let total_amount_base = table.convert(total, &form.currency, table.base())?;

        let order = NewOrder {
            user_id: user.map(|user| user.id),
            total_amount_base,
            currency: form.currency.clone(),
            description: form.description.trim().to_string(),
            customer_name: form.name.trim().to_string(),
            customer_email: form.email.trim().to_string(),
            customer_whatsapp: form.customer_whatsapp(),
            status,
            payment_method: method,
        };
        let row = self.collaborators.orders.insert_order(order).await?;
        info!(
            order_id = %row.id,
            status = %status,
            method = %method,
            total_amount_base = %total_amount_base,
            "Order created"
        );
        Ok(row.id)
    }

    fn title_for(&self, form: &PaymentForm) -> String {
        match form.description.trim() {
            "" => self.config.fallback_description.clone(),
            description => description.to_string(),
        }
    }

    async fn fail(&self, message: String) -> SubmissionOutcome {
        self.view.write().await.error_message = Some(message.clone());
        SubmissionOutcome::Failed(message)
    }

    /// Close the confirmation modal and forget the order it was showing.
    pub async fn close_confirmation(&self) {
        let mut view = self.view.write().await;
        view.confirmation = None;
        view.current_order_id = None;
    }

    /// Copy text and raise the channel's acknowledgement flag on success.
    /// Failures are logged only.
    pub async fn copy_to_clipboard(&self, text: &str, channel: TransferChannel) {
        let result = match &self.clipboard {
            Some(clipboard) => clipboard.write_text(text).await,
            None => Err(ClipboardError::Unavailable),
        };
        match result {
            Ok(()) => self.copied.raise(channel),
            Err(e) => warn!(error = %e, channel = %channel, "Failed to copy text"),
        }
    }

    /// Copy the configured payee handle of a channel.
    pub async fn copy_payee_details(&self, channel: TransferChannel) {
        let handle = self.config.payees.handle(channel).to_string();
        self.copy_to_clipboard(&handle, channel).await;
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
