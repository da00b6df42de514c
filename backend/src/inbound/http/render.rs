//! Template rendering for server-side pages.
//!
//! Handlers fill a [`TemplateData`] bag and name a template; a
//! [`TemplateRenderer`] turns the pair into HTML. [`AskamaRenderer`] backs
//! every name with a compile-time checked template under `templates/`.

use std::collections::HashMap;

use actix_web::HttpResponse;
use actix_web::http::header::{self, ContentType};
use askama::Template;

use crate::domain::{
    Attachment, Customer, Error, Form, Memorandum, Partner, Reservation, ReservationConfirmation,
    ReservationSource, Room, TradeLicense,
};
use crate::inbound::http::HttpResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Errors raised while rendering a page.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No template is registered under the requested name.
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),
    /// The page data does not fit the requested template.
    #[error("template `{template}` cannot render the supplied page data")]
    DataMismatch { template: String },
    /// The template engine failed.
    #[error(transparent)]
    Askama(#[from] askama::Error),
}

/// Page-specific records shown by a template.
#[derive(Debug, Clone, Default)]
pub enum PageData {
    #[default]
    None,
    Rooms(Vec<Room>),
    Confirmation(ReservationConfirmation),
    Reservations(Vec<Reservation>),
    AdminReservation {
        reservation: Reservation,
        source: ReservationSource,
    },
    Customers(Vec<Customer>),
    Customer(Customer),
    CustomerDetails {
        customer: Customer,
        attachments: Vec<Attachment>,
    },
    TradeLicense {
        customer: Customer,
        license: Option<TradeLicense>,
    },
    Partners {
        customer: Customer,
        partners: Vec<Partner>,
    },
    Memoranda {
        customer: Customer,
        memoranda: Vec<Memorandum>,
    },
}

/// Everything a template may read.
///
/// # Examples
/// ```
/// use roomdesk::domain::{FieldSet, Form};
/// use roomdesk::inbound::http::render::TemplateData;
///
/// let mut form = Form::new(FieldSet::from_pairs([("email", "nope")]));
/// form.is_email("email");
/// let data = TemplateData::default().with_form(form);
/// assert_eq!(data.value("email"), "nope");
/// assert_eq!(data.invalid_class("email"), "is-invalid");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub string_map: HashMap<String, String>,
    pub flash: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub is_authenticated: bool,
    pub form: Form,
    pub page: PageData,
}

impl TemplateData {
    /// Data carrying only page records.
    pub fn page(page: PageData) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Attach the submitted form and its errors.
    #[must_use]
    pub fn with_form(mut self, form: Form) -> Self {
        self.form = form;
        self
    }

    /// Add a loose string value.
    #[must_use]
    pub fn with_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.string_map.insert(key.to_owned(), value.into());
        self
    }

    /// Loose string value, or `""`.
    pub fn string(&self, key: &str) -> &str {
        self.string_map.get(key).map_or("", String::as_str)
    }

    /// Submitted value of a form field, or `""`.
    pub fn value(&self, name: &str) -> &str {
        self.form.value(name)
    }

    /// First validation message for a field, or `""`.
    pub fn field_error(&self, name: &str) -> &str {
        self.form.errors().get(name)
    }

    /// CSS class marking an invalid input.
    pub fn invalid_class(&self, name: &str) -> &'static str {
        if self.form.errors().has(name) {
            "is-invalid"
        } else {
            ""
        }
    }

    pub fn flash_message(&self) -> &str {
        self.flash.as_deref().unwrap_or_default()
    }

    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }

    pub fn warning_message(&self) -> &str {
        self.warning.as_deref().unwrap_or_default()
    }
}

/// Turns a template name and its data into HTML.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, data: &TemplateData) -> Result<String, RenderError>;
}

mod filters {
    use std::borrow::Borrow;

    use chrono::NaiveDate;

    use crate::domain::DATE_FORMAT;

    /// Formats an optional date, rendering `None` as an empty string.
    pub fn opt_date<T: Borrow<Option<NaiveDate>>>(date: T) -> askama::Result<String> {
        Ok(date
            .borrow()
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default())
    }

    /// Formats an optional number, rendering `None` as an empty string.
    pub fn opt_number<T: Borrow<Option<i32>>>(value: T) -> askama::Result<String> {
        Ok(value.borrow().map(|n| n.to_string()).unwrap_or_default())
    }
}

macro_rules! simple_pages {
    ($($page:ident => $path:tt),+ $(,)?) => {
        $(
            #[derive(Template)]
            #[template(path = $path)]
            struct $page<'a> {
                data: &'a TemplateData,
            }
        )+
    };
}

simple_pages! {
    HomePage => "home.page.html",
    AboutPage => "about.page.html",
    GeneralsPage => "generals.page.html",
    MajorsPage => "majors.page.html",
    ContactPage => "contact.page.html",
    SearchAvailabilityPage => "search-availability.page.html",
    MakeReservationPage => "make-reservation.page.html",
    LoginPage => "login.page.html",
    AdminDashboardPage => "admin-dashboard.page.html",
    CustomerAddPage => "customer-add.page.html",
}

#[derive(Template)]
#[template(path = "choose-room.page.html")]
struct ChooseRoomPage<'a> {
    data: &'a TemplateData,
    rooms: &'a [Room],
}

#[derive(Template)]
#[template(path = "reservation-summary.page.html")]
struct ReservationSummaryPage<'a> {
    data: &'a TemplateData,
    confirmation: &'a ReservationConfirmation,
}

#[derive(Template)]
#[template(path = "admin-reservations.page.html")]
struct AdminReservationsPage<'a> {
    data: &'a TemplateData,
    heading: &'a str,
    source: ReservationSource,
    reservations: &'a [Reservation],
}

#[derive(Template)]
#[template(path = "admin-reservations-show.page.html")]
struct AdminReservationShowPage<'a> {
    data: &'a TemplateData,
    reservation: &'a Reservation,
    source: ReservationSource,
}

#[derive(Template)]
#[template(path = "customer-all.page.html")]
struct CustomerAllPage<'a> {
    data: &'a TemplateData,
    customers: &'a [Customer],
}

#[derive(Template)]
#[template(path = "customer-details.page.html")]
struct CustomerDetailsPage<'a> {
    data: &'a TemplateData,
    customer: &'a Customer,
    attachments: &'a [Attachment],
}

#[derive(Template)]
#[template(path = "trade-license.page.html")]
struct TradeLicensePage<'a> {
    data: &'a TemplateData,
    customer: &'a Customer,
    license: &'a Option<TradeLicense>,
}

#[derive(Template)]
#[template(path = "partners.page.html")]
struct PartnersPage<'a> {
    data: &'a TemplateData,
    customer: &'a Customer,
    partners: &'a [Partner],
}

#[derive(Template)]
#[template(path = "memorandum.page.html")]
struct MemorandumPage<'a> {
    data: &'a TemplateData,
    customer: &'a Customer,
    memoranda: &'a [Memorandum],
}

#[derive(Template)]
#[template(path = "add-partner.page.html")]
struct AddPartnerPage<'a> {
    data: &'a TemplateData,
    customer: &'a Customer,
}

#[derive(Template)]
#[template(path = "add-memorandum.page.html")]
struct AddMemorandumPage<'a> {
    data: &'a TemplateData,
    customer: &'a Customer,
}

/// Renderer backed by the compiled Askama templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskamaRenderer;

impl AskamaRenderer {
    fn render_page(name: &str, data: &TemplateData) -> Result<String, RenderError> {
        let mismatch = || RenderError::DataMismatch {
            template: name.to_owned(),
        };
        let html = match (name, &data.page) {
            ("home", _) => HomePage { data }.render()?,
            ("about", _) => AboutPage { data }.render()?,
            ("generals", _) => GeneralsPage { data }.render()?,
            ("majors", _) => MajorsPage { data }.render()?,
            ("contact", _) => ContactPage { data }.render()?,
            ("search-availability", _) => SearchAvailabilityPage { data }.render()?,
            ("make-reservation", _) => MakeReservationPage { data }.render()?,
            ("login", _) => LoginPage { data }.render()?,
            ("admin-dashboard", _) => AdminDashboardPage { data }.render()?,
            ("customer-add", _) => CustomerAddPage { data }.render()?,
            ("choose-room", PageData::Rooms(rooms)) => ChooseRoomPage { data, rooms }.render()?,
            ("reservation-summary", PageData::Confirmation(confirmation)) => {
                ReservationSummaryPage { data, confirmation }.render()?
            }
            ("admin-new-reservations", PageData::Reservations(reservations)) => {
                AdminReservationsPage {
                    data,
                    heading: "New Reservations",
                    source: ReservationSource::New,
                    reservations,
                }
                .render()?
            }
            ("admin-all-reservations", PageData::Reservations(reservations)) => {
                AdminReservationsPage {
                    data,
                    heading: "All Reservations",
                    source: ReservationSource::All,
                    reservations,
                }
                .render()?
            }
            (
                "admin-reservations-show",
                PageData::AdminReservation {
                    reservation,
                    source,
                },
            ) => AdminReservationShowPage {
                data,
                reservation,
                source: *source,
            }
            .render()?,
            ("customer-all", PageData::Customers(customers)) => {
                CustomerAllPage { data, customers }.render()?
            }
            (
                "customer-details",
                PageData::CustomerDetails {
                    customer,
                    attachments,
                },
            ) => CustomerDetailsPage {
                data,
                customer,
                attachments,
            }
            .render()?,
            ("trade-license", PageData::TradeLicense { customer, license }) => {
                TradeLicensePage {
                    data,
                    customer,
                    license,
                }
                .render()?
            }
            ("partners", PageData::Partners { customer, partners }) => PartnersPage {
                data,
                customer,
                partners,
            }
            .render()?,
            ("memorandum", PageData::Memoranda { customer, memoranda }) => MemorandumPage {
                data,
                customer,
                memoranda,
            }
            .render()?,
            ("add-partner", PageData::Customer(customer)) => {
                AddPartnerPage { data, customer }.render()?
            }
            ("add-memorandum", PageData::Customer(customer)) => {
                AddMemorandumPage { data, customer }.render()?
            }
            (
                "choose-room"
                | "reservation-summary"
                | "admin-new-reservations"
                | "admin-all-reservations"
                | "admin-reservations-show"
                | "customer-all"
                | "customer-details"
                | "trade-license"
                | "partners"
                | "memorandum"
                | "add-partner"
                | "add-memorandum",
                _,
            ) => return Err(mismatch()),
            (other, _) => return Err(RenderError::UnknownTemplate(other.to_owned())),
        };
        Ok(html)
    }
}

impl TemplateRenderer for AskamaRenderer {
    fn render(&self, name: &str, data: &TemplateData) -> Result<String, RenderError> {
        Self::render_page(name, data)
    }
}

/// Render `name` as a `200 OK` HTML page.
///
/// Pending flash, error and warning messages are consumed from the session
/// and the authentication flag is filled in before rendering.
pub fn render_page(
    state: &HttpState,
    session: &SessionContext,
    name: &str,
    mut data: TemplateData,
) -> HttpResult<HttpResponse> {
    let flash = session.take_flash();
    let error = session.take_error();
    let warning = session.take_warning();
    data.flash = data.flash.or(flash);
    data.error = data.error.or(error);
    data.warning = data.warning.or(warning);
    data.is_authenticated = session.is_authenticated();

    let body = state
        .renderer
        .render(name, &data)
        .map_err(|err| Error::internal(format!("failed to render {name}: {err}")))?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

/// `303 See Other` redirect to `location`.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BLANK_MESSAGE, CustomerDraft, FieldSet};
    use rstest::rstest;

    fn customer() -> Customer {
        Customer {
            customer_id: 4,
            details: CustomerDraft {
                customer_code: "C-4".into(),
                customer_name: "Acme <Trading>".into(),
                ..CustomerDraft::default()
            },
        }
    }

    #[rstest]
    #[case("home")]
    #[case("about")]
    #[case("generals")]
    #[case("majors")]
    #[case("contact")]
    #[case("search-availability")]
    #[case("make-reservation")]
    #[case("login")]
    #[case("admin-dashboard")]
    #[case("customer-add")]
    fn static_pages_render_with_default_data(#[case] name: &str) {
        let html = AskamaRenderer
            .render(name, &TemplateData::default())
            .expect("page renders");
        assert!(html.contains("</html>"));
    }

    #[test]
    fn unknown_template_is_rejected() {
        let err = AskamaRenderer
            .render("missing", &TemplateData::default())
            .expect_err("unknown template");
        assert!(matches!(err, RenderError::UnknownTemplate(name) if name == "missing"));
    }

    #[rstest]
    #[case("choose-room")]
    #[case("customer-details")]
    #[case("add-partner")]
    fn pages_without_their_records_are_rejected(#[case] name: &str) {
        let err = AskamaRenderer
            .render(name, &TemplateData::default())
            .expect_err("data mismatch");
        assert!(matches!(err, RenderError::DataMismatch { .. }));
    }

    #[test]
    fn form_errors_and_values_reach_the_page() {
        let mut form = Form::new(FieldSet::from_pairs([("first_name", "Jo"), ("email", "")]));
        form.required(&["email"]);
        form.min_length("first_name", 3);
        let html = AskamaRenderer
            .render("make-reservation", &TemplateData::default().with_form(form))
            .expect("page renders");
        assert!(html.contains("value=\"Jo\""));
        assert!(html.contains("This field must be at least 3 characters long"));
        assert!(html.contains(BLANK_MESSAGE));
    }

    #[test]
    fn record_fields_are_escaped() {
        let data = TemplateData::page(PageData::Customer(customer()));
        let html = AskamaRenderer
            .render("add-partner", &data)
            .expect("page renders");
        assert!(html.contains("Acme &lt;Trading&gt;"));
        assert!(!html.contains("Acme <Trading>"));
    }

    #[test]
    fn flash_messages_are_shown() {
        let data = TemplateData {
            flash: Some("Changes saved".into()),
            error: Some("No availability".into()),
            ..TemplateData::default()
        };
        let html = AskamaRenderer.render("home", &data).expect("page renders");
        assert!(html.contains("Changes saved"));
        assert!(html.contains("No availability"));
    }

    #[test]
    fn navigation_follows_authentication() {
        let anonymous = AskamaRenderer
            .render("home", &TemplateData::default())
            .expect("page renders");
        assert!(anonymous.contains("/user/login"));
        assert!(!anonymous.contains("/user/logout"));

        let signed_in = TemplateData {
            is_authenticated: true,
            ..TemplateData::default()
        };
        let html = AskamaRenderer.render("home", &signed_in).expect("page renders");
        assert!(html.contains("/user/logout"));
        assert!(html.contains("/admin/dashboard"));
    }
}
