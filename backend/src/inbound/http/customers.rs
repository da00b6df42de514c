//! Customer onboarding handlers. Every route requires a logged-in user.
//!
//! ```text
//! GET  /customer/add
//! POST /customer/add                     multipart, files under "photos"
//! GET  /customer/all
//! GET  /customer/details/{id}
//! GET  /customer/trade-license/{id}
//! POST /customer/trade-license/{id}      multipart, file "license_file"
//! GET  /customer/partners/{id}
//! GET  /customer/memorandum/{id}
//! GET  /customer/add-partner/{id}
//! POST /customer/add-partner/{id}        multipart, "id_file" + "passport_file"
//! GET  /customer/add-memorandum/{id}
//! POST /customer/add-memorandum/{id}     multipart, "id_file" + "passport_file"
//! GET  /customer/document/{path}
//! ```
//!
//! Uploads are validated before any file is written. Files are stored
//! first, then the row that references them.

use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use tracing::{debug, info};

use crate::domain::{
    Customer, CustomerDraft, DocumentFolder, DocumentUpload, Error, FieldSet, Form,
    MemorandumDraft, NewAttachment, PartnerDraft, StoredDocument, TradeLicenseDraft,
};
use crate::inbound::http::HttpResult;
use crate::inbound::http::multipart::{MAX_UPLOAD_BYTES, MultipartForm, read_multipart};
use crate::inbound::http::render::{PageData, TemplateData, render_page, see_other};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_optional_date, parse_optional_number,
};

const CUSTOMER_REQUIRED: &[&str] = &[
    "customer_code",
    "customer_name",
    "contact_person",
    "contact_no",
    "mobile_no",
    "email",
];
const TRADE_LICENSE_REQUIRED: &[&str] = &["trade_license_no", "license_expiry", "mohre_no"];
const PARTNER_REQUIRED: &[&str] = &["name", "emirates_id", "passport"];
const MEMORANDUM_REQUIRED: &[&str] = &["representative_name", "no_of_shares"];

const ESTABLISHMENT_DATE: FieldName = FieldName::new("establishment_date");
const REGISTRATION_DATE: FieldName = FieldName::new("registration_date");
const LICENSE_EXPIRY: FieldName = FieldName::new("license_expiry");
const EMIRATES_ID_EXPIRY: FieldName = FieldName::new("emirates_id_expiry");
const PASSPORT_EXPIRY: FieldName = FieldName::new("passport_expiry");
const NO_OF_SHARES: FieldName = FieldName::new("no_of_shares");

async fn load_customer(state: &HttpState, id: i32) -> HttpResult<Customer> {
    state
        .customers
        .find_customer(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("customer {id} does not exist")))
}

async fn read_upload(payload: Multipart) -> HttpResult<MultipartForm> {
    read_multipart(payload, MAX_UPLOAD_BYTES).await
}

async fn store_upload(
    state: &HttpState,
    folder: &DocumentFolder,
    upload: Option<&DocumentUpload>,
) -> HttpResult<Option<StoredDocument>> {
    match upload {
        Some(upload) => Ok(Some(state.documents.store(folder, upload).await?)),
        None => Ok(None),
    }
}

/// Keep `document` only while its file is still present in the store.
async fn present(
    state: &HttpState,
    document: Option<StoredDocument>,
) -> HttpResult<Option<StoredDocument>> {
    match document {
        Some(document) if state.documents.exists(&document.path).await? => Ok(Some(document)),
        Some(document) => {
            debug!(path = %document.path, "stored document missing from upload root");
            Ok(None)
        }
        None => Ok(None),
    }
}

fn text(fields: &FieldSet, name: &str) -> String {
    fields.value(name).to_owned()
}

fn customer_draft(fields: &FieldSet) -> CustomerDraft {
    CustomerDraft {
        customer_code: text(fields, "customer_code"),
        customer_name: text(fields, "customer_name"),
        contact_person: text(fields, "contact_person"),
        contact_no: text(fields, "contact_no"),
        mobile_no: text(fields, "mobile_no"),
        email: text(fields, "email"),
        business_name: text(fields, "business_name"),
        location_details: text(fields, "location_details"),
        status: text(fields, "status"),
        nature_of_business: text(fields, "nature_of_business"),
        marketed_by: text(fields, "marketed_by"),
        marketer_name: text(fields, "marketer_name"),
        marketer_email: text(fields, "marketer_email"),
    }
}

/// Customer intake form.
#[get("/customer/add")]
pub async fn show_add_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    render_page(&state, &session, "customer-add", TemplateData::default())
}

/// Store a customer and any documents uploaded with it.
#[post("/customer/add")]
pub async fn add_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let upload = read_upload(payload).await?;

    let mut form = Form::new(upload.fields.clone());
    form.required(CUSTOMER_REQUIRED);
    form.is_email("email");
    if !form.is_valid() {
        let data = TemplateData::default().with_form(form);
        return render_page(&state, &session, "customer-add", data);
    }

    let draft = customer_draft(form.fields());
    let customer_id = state.customers.insert_customer(&draft).await?;
    let folder = DocumentFolder::customer(&draft.customer_code);
    for file in upload.files_named("photos") {
        let document = state.documents.store(&folder, file).await?;
        state
            .customers
            .insert_attachment(&NewAttachment {
                customer_id,
                customer_code: draft.customer_code.clone(),
                document,
            })
            .await?;
    }
    info!(customer_id, "customer added");
    session.put_flash(&format!("New Customer Added Successfully. ID: {customer_id}"))?;
    Ok(see_other("/customer/all"))
}

/// Every customer, newest first.
#[get("/customer/all")]
pub async fn all_customers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customers = state.customers.all_customers().await?;
    let data = TemplateData::page(PageData::Customers(customers));
    render_page(&state, &session, "customer-all", data)
}

/// One customer with the attachments still present on disk.
#[get("/customer/details/{id}")]
pub async fn customer_details(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    let mut attachments = Vec::new();
    for attachment in state.customers.attachments_for(customer.customer_id).await? {
        if state.documents.exists(&attachment.document.path).await? {
            attachments.push(attachment);
        }
    }
    let data = TemplateData::page(PageData::CustomerDetails {
        customer,
        attachments,
    });
    render_page(&state, &session, "customer-details", data)
}

async fn trade_license_page(state: &HttpState, customer: Customer) -> HttpResult<TemplateData> {
    let mut license = state
        .customers
        .find_trade_license(customer.customer_id)
        .await?;
    if let Some(license) = license.as_mut() {
        license.details.document = present(state, license.details.document.take()).await?;
    }
    Ok(TemplateData::page(PageData::TradeLicense { customer, license }))
}

/// Current trade license of a customer and the form to record a new one.
#[get("/customer/trade-license/{id}")]
pub async fn show_trade_license(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    let data = trade_license_page(&state, customer).await?;
    render_page(&state, &session, "trade-license", data)
}

/// Record a trade license with an optional scan.
#[post("/customer/trade-license/{id}")]
pub async fn add_trade_license(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: Multipart,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    let upload = read_upload(payload).await?;

    let mut form = Form::new(upload.fields.clone());
    form.required(TRADE_LICENSE_REQUIRED);
    if !form.is_valid() {
        let data = trade_license_page(&state, customer).await?.with_form(form);
        return render_page(&state, &session, "trade-license", data);
    }

    let fields = form.fields();
    let mut draft = TradeLicenseDraft {
        customer_id: customer.customer_id,
        trade_license_no: text(fields, "trade_license_no"),
        emirate: text(fields, "emirate"),
        mohre_no: text(fields, "mohre_no"),
        trade_name: text(fields, "trade_name"),
        legal_status: text(fields, "legal_status"),
        establishment_date: parse_optional_date(fields, ESTABLISHMENT_DATE)?,
        registration_date: parse_optional_date(fields, REGISTRATION_DATE)?,
        license_expiry: Some(parse_date(fields, LICENSE_EXPIRY)?),
        document: None,
    };
    let folder = DocumentFolder::trade_license(
        &customer.details.customer_code,
        &draft.trade_license_no,
    );
    draft.document = store_upload(&state, &folder, upload.file("license_file")).await?;

    let trade_license_id = state.customers.insert_trade_license(&draft).await?;
    info!(
        customer_id = customer.customer_id,
        trade_license_id, "trade license added"
    );
    session.put_flash(&format!(
        "New Trade License Added Successfully. ID: {trade_license_id}"
    ))?;
    Ok(see_other("/customer/all"))
}

/// Partners of a customer.
#[get("/customer/partners/{id}")]
pub async fn list_partners(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    let mut partners = state.customers.partners_for(customer.customer_id).await?;
    for partner in &mut partners {
        let details = &mut partner.details;
        details.id_document = present(&state, details.id_document.take()).await?;
        details.passport_document = present(&state, details.passport_document.take()).await?;
    }
    let data = TemplateData::page(PageData::Partners { customer, partners });
    render_page(&state, &session, "partners", data)
}

/// Memorandum representatives of a customer.
#[get("/customer/memorandum/{id}")]
pub async fn list_memoranda(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    let mut memoranda = state.customers.memoranda_for(customer.customer_id).await?;
    for memorandum in &mut memoranda {
        let details = &mut memorandum.details;
        details.id_document = present(&state, details.id_document.take()).await?;
        details.passport_document = present(&state, details.passport_document.take()).await?;
    }
    let data = TemplateData::page(PageData::Memoranda {
        customer,
        memoranda,
    });
    render_page(&state, &session, "memorandum", data)
}

/// Partner form.
#[get("/customer/add-partner/{id}")]
pub async fn show_add_partner(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    render_page(
        &state,
        &session,
        "add-partner",
        TemplateData::page(PageData::Customer(customer)),
    )
}

/// Record a partner with optional identity scans.
#[post("/customer/add-partner/{id}")]
pub async fn add_partner(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: Multipart,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    let upload = read_upload(payload).await?;

    let mut form = Form::new(upload.fields.clone());
    form.required(PARTNER_REQUIRED);
    if !form.is_valid() {
        let data = TemplateData::page(PageData::Customer(customer)).with_form(form);
        return render_page(&state, &session, "add-partner", data);
    }

    let customer_id = customer.customer_id;
    let trade_license_id = state
        .customers
        .find_trade_license(customer_id)
        .await?
        .map(|license| license.trade_license_id);
    let fields = form.fields();
    let mut draft = PartnerDraft {
        customer_id,
        customer_code: customer.details.customer_code.clone(),
        trade_license_id,
        name: text(fields, "name"),
        role: text(fields, "role"),
        nationality: text(fields, "nationality"),
        no_of_shares: parse_optional_number(fields, NO_OF_SHARES)?,
        emirates_id: text(fields, "emirates_id"),
        emirates_id_expiry: parse_optional_date(fields, EMIRATES_ID_EXPIRY)?,
        passport: text(fields, "passport"),
        passport_expiry: parse_optional_date(fields, PASSPORT_EXPIRY)?,
        id_document: None,
        passport_document: None,
    };
    let folder = DocumentFolder::partners(&draft.customer_code);
    draft.id_document = store_upload(&state, &folder, upload.file("id_file")).await?;
    draft.passport_document = store_upload(&state, &folder, upload.file("passport_file")).await?;

    let partner_id = state.customers.insert_partner(&draft).await?;
    info!(customer_id, partner_id, "partner added");
    session.put_flash(&format!("New Partner Added Successfully. ID: {partner_id}"))?;
    Ok(see_other(&format!("/customer/partners/{customer_id}")))
}

/// Memorandum representative form.
#[get("/customer/add-memorandum/{id}")]
pub async fn show_add_memorandum(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    render_page(
        &state,
        &session,
        "add-memorandum",
        TemplateData::page(PageData::Customer(customer)),
    )
}

/// Record a memorandum representative with optional identity scans.
#[post("/customer/add-memorandum/{id}")]
pub async fn add_memorandum(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: Multipart,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let customer = load_customer(&state, path.into_inner()).await?;
    let upload = read_upload(payload).await?;

    let mut form = Form::new(upload.fields.clone());
    form.required(MEMORANDUM_REQUIRED);
    if !form.is_valid() {
        let data = TemplateData::page(PageData::Customer(customer)).with_form(form);
        return render_page(&state, &session, "add-memorandum", data);
    }

    let customer_id = customer.customer_id;
    let trade_license_id = state
        .customers
        .find_trade_license(customer_id)
        .await?
        .map(|license| license.trade_license_id);
    let fields = form.fields();
    let mut draft = MemorandumDraft {
        customer_id,
        customer_code: customer.details.customer_code.clone(),
        trade_license_id,
        representative_name: text(fields, "representative_name"),
        no_of_shares: text(fields, "no_of_shares"),
        emirates_id: text(fields, "emirates_id"),
        emirates_id_expiry: parse_optional_date(fields, EMIRATES_ID_EXPIRY)?,
        passport: text(fields, "passport"),
        passport_expiry: parse_optional_date(fields, PASSPORT_EXPIRY)?,
        id_document: None,
        passport_document: None,
    };
    let folder = DocumentFolder::memorandum(&draft.customer_code);
    draft.id_document = store_upload(&state, &folder, upload.file("id_file")).await?;
    draft.passport_document = store_upload(&state, &folder, upload.file("passport_file")).await?;

    let memorandum_id = state.customers.insert_memorandum(&draft).await?;
    info!(customer_id, memorandum_id, "memorandum representative added");
    session.put_flash(&format!(
        "New Representative Added Successfully. ID: {memorandum_id}"
    ))?;
    Ok(see_other(&format!("/customer/memorandum/{customer_id}")))
}

/// Stream a stored document as an attachment.
#[get("/customer/document/{path:.*}")]
pub async fn download_document(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> HttpResult<HttpResponse> {
    session.require_user_id()?;
    let path = path.into_inner();
    let missing = || Error::not_found(format!("document {path:?} does not exist"));
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(missing());
    }
    let bytes = state.documents.read(&path).await?.ok_or_else(missing)?;
    let file_name = path.rsplit('/').next().unwrap_or(path.as_str()).to_owned();
    Ok(HttpResponse::Ok()
        .content_type(ContentType::octet_stream())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}
