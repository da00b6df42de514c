//! PostgreSQL-backed `CustomerRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CustomerPersistenceError, CustomerRepository};
use crate::domain::{
    Attachment, Customer, CustomerDraft, Memorandum, MemorandumDraft, NewAttachment, Partner,
    PartnerDraft, StoredDocument, TradeLicense, TradeLicenseDraft,
};

use super::diesel_basic_error_mapping::map_db_error;
use super::models::{
    AttachmentRow, CustomerRow, MemorandumRow, NewAttachmentRow, NewCustomerRow, PartnerRow,
    TradeLicenseRow,
};
use super::pool::DbPool;
use super::schema::{customer_attachments, customers, memoranda, partners, trade_licenses};

/// Diesel-backed implementation of the `CustomerRepository` port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn document_columns(document: Option<&StoredDocument>) -> (Option<String>, Option<String>) {
    document.map_or((None, None), |doc| {
        (Some(doc.path.clone()), Some(doc.file_name.clone()))
    })
}

fn document_from_columns(path: Option<String>, file_name: Option<String>) -> Option<StoredDocument> {
    match (path, file_name) {
        (Some(path), Some(file_name)) => Some(StoredDocument { path, file_name }),
        (Some(path), None) => Some(StoredDocument {
            file_name: path.rsplit('/').next().unwrap_or_default().to_owned(),
            path,
        }),
        (None, _) => None,
    }
}

fn row_to_customer(row: CustomerRow) -> Customer {
    Customer {
        customer_id: row.customer_id,
        details: CustomerDraft {
            customer_code: row.customer_code,
            customer_name: row.customer_name,
            contact_person: row.contact_person,
            contact_no: row.contact_no,
            mobile_no: row.mobile_no,
            email: row.email,
            business_name: row.business_name,
            location_details: row.location_details,
            status: row.status,
            nature_of_business: row.nature_of_business,
            marketed_by: row.marketed_by,
            marketer_name: row.marketer_name,
            marketer_email: row.marketer_email,
        },
    }
}

fn row_to_attachment(row: AttachmentRow) -> Attachment {
    Attachment {
        file_id: row.file_id,
        customer_id: row.customer_id,
        customer_code: row.customer_code,
        document: StoredDocument {
            path: row.file_path,
            file_name: row.file_name,
        },
    }
}

fn trade_license_to_row(draft: &TradeLicenseDraft) -> TradeLicenseRow {
    let (file_path, file_name) = document_columns(draft.document.as_ref());
    TradeLicenseRow {
        trade_license_id: 0,
        customer_id: draft.customer_id,
        trade_license_no: draft.trade_license_no.clone(),
        emirate: draft.emirate.clone(),
        mohre_no: draft.mohre_no.clone(),
        trade_name: draft.trade_name.clone(),
        legal_status: draft.legal_status.clone(),
        establishment_date: draft.establishment_date,
        registration_date: draft.registration_date,
        license_expiry: draft.license_expiry,
        file_path,
        file_name,
    }
}

fn row_to_trade_license(row: TradeLicenseRow) -> TradeLicense {
    TradeLicense {
        trade_license_id: row.trade_license_id,
        details: TradeLicenseDraft {
            customer_id: row.customer_id,
            trade_license_no: row.trade_license_no,
            emirate: row.emirate,
            mohre_no: row.mohre_no,
            trade_name: row.trade_name,
            legal_status: row.legal_status,
            establishment_date: row.establishment_date,
            registration_date: row.registration_date,
            license_expiry: row.license_expiry,
            document: document_from_columns(row.file_path, row.file_name),
        },
    }
}

fn partner_to_row(draft: &PartnerDraft) -> PartnerRow {
    let (id_file_path, id_file_name) = document_columns(draft.id_document.as_ref());
    let (passport_file_path, passport_file_name) =
        document_columns(draft.passport_document.as_ref());
    PartnerRow {
        partner_id: 0,
        customer_id: draft.customer_id,
        customer_code: draft.customer_code.clone(),
        trade_license_id: draft.trade_license_id,
        name: draft.name.clone(),
        role: draft.role.clone(),
        nationality: draft.nationality.clone(),
        no_of_shares: draft.no_of_shares,
        emirates_id: draft.emirates_id.clone(),
        emirates_id_expiry: draft.emirates_id_expiry,
        passport: draft.passport.clone(),
        passport_expiry: draft.passport_expiry,
        id_file_path,
        id_file_name,
        passport_file_path,
        passport_file_name,
    }
}

fn row_to_partner(row: PartnerRow) -> Partner {
    Partner {
        partner_id: row.partner_id,
        details: PartnerDraft {
            customer_id: row.customer_id,
            customer_code: row.customer_code,
            trade_license_id: row.trade_license_id,
            name: row.name,
            role: row.role,
            nationality: row.nationality,
            no_of_shares: row.no_of_shares,
            emirates_id: row.emirates_id,
            emirates_id_expiry: row.emirates_id_expiry,
            passport: row.passport,
            passport_expiry: row.passport_expiry,
            id_document: document_from_columns(row.id_file_path, row.id_file_name),
            passport_document: document_from_columns(
                row.passport_file_path,
                row.passport_file_name,
            ),
        },
    }
}

fn memorandum_to_row(draft: &MemorandumDraft) -> MemorandumRow {
    let (id_file_path, id_file_name) = document_columns(draft.id_document.as_ref());
    let (passport_file_path, passport_file_name) =
        document_columns(draft.passport_document.as_ref());
    MemorandumRow {
        memorandum_id: 0,
        customer_id: draft.customer_id,
        customer_code: draft.customer_code.clone(),
        trade_license_id: draft.trade_license_id,
        representative_name: draft.representative_name.clone(),
        no_of_shares: draft.no_of_shares.clone(),
        emirates_id: draft.emirates_id.clone(),
        emirates_id_expiry: draft.emirates_id_expiry,
        passport: draft.passport.clone(),
        passport_expiry: draft.passport_expiry,
        id_file_path,
        id_file_name,
        passport_file_path,
        passport_file_name,
    }
}

fn row_to_memorandum(row: MemorandumRow) -> Memorandum {
    Memorandum {
        memorandum_id: row.memorandum_id,
        details: MemorandumDraft {
            customer_id: row.customer_id,
            customer_code: row.customer_code,
            trade_license_id: row.trade_license_id,
            representative_name: row.representative_name,
            no_of_shares: row.no_of_shares,
            emirates_id: row.emirates_id,
            emirates_id_expiry: row.emirates_id_expiry,
            passport: row.passport,
            passport_expiry: row.passport_expiry,
            id_document: document_from_columns(row.id_file_path, row.id_file_name),
            passport_document: document_from_columns(
                row.passport_file_path,
                row.passport_file_name,
            ),
        },
    }
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn insert_customer(
        &self,
        draft: &CustomerDraft,
    ) -> Result<i32, CustomerPersistenceError> {
        let row = NewCustomerRow {
            customer_code: &draft.customer_code,
            customer_name: &draft.customer_name,
            contact_person: &draft.contact_person,
            contact_no: &draft.contact_no,
            mobile_no: &draft.mobile_no,
            email: &draft.email,
            business_name: &draft.business_name,
            location_details: &draft.location_details,
            status: &draft.status,
            nature_of_business: &draft.nature_of_business,
            marketed_by: &draft.marketed_by,
            marketer_name: &draft.marketer_name,
            marketer_email: &draft.marketer_email,
        };
        self.pool
            .write(|mut conn| async move {
                diesel::insert_into(customers::table)
                    .values(&row)
                    .returning(customers::customer_id)
                    .get_result::<i32>(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)
    }

    async fn all_customers(&self) -> Result<Vec<Customer>, CustomerPersistenceError> {
        let rows = self
            .pool
            .read(|mut conn| async move {
                customers::table
                    .order(customers::customer_id.desc())
                    .select(CustomerRow::as_select())
                    .load(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(row_to_customer).collect())
    }

    async fn find_customer(&self, id: i32) -> Result<Option<Customer>, CustomerPersistenceError> {
        let row = self
            .pool
            .read(|mut conn| async move {
                customers::table
                    .find(id)
                    .select(CustomerRow::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
            })
            .await
            .map_err(map_db_error)?;
        Ok(row.map(row_to_customer))
    }

    async fn insert_attachment(
        &self,
        attachment: &NewAttachment,
    ) -> Result<i32, CustomerPersistenceError> {
        let row = NewAttachmentRow {
            customer_id: attachment.customer_id,
            customer_code: &attachment.customer_code,
            file_path: &attachment.document.path,
            file_name: &attachment.document.file_name,
        };
        self.pool
            .write(|mut conn| async move {
                diesel::insert_into(customer_attachments::table)
                    .values(&row)
                    .returning(customer_attachments::file_id)
                    .get_result::<i32>(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)
    }

    async fn attachments_for(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Attachment>, CustomerPersistenceError> {
        let rows = self
            .pool
            .read(|mut conn| async move {
                customer_attachments::table
                    .filter(customer_attachments::customer_id.eq(customer_id))
                    .order(customer_attachments::file_id.asc())
                    .select(AttachmentRow::as_select())
                    .load(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(row_to_attachment).collect())
    }

    async fn find_trade_license(
        &self,
        customer_id: i32,
    ) -> Result<Option<TradeLicense>, CustomerPersistenceError> {
        let row = self
            .pool
            .read(|mut conn| async move {
                trade_licenses::table
                    .filter(trade_licenses::customer_id.eq(customer_id))
                    .order(trade_licenses::trade_license_id.desc())
                    .select(TradeLicenseRow::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
            })
            .await
            .map_err(map_db_error)?;
        Ok(row.map(row_to_trade_license))
    }

    async fn insert_trade_license(
        &self,
        draft: &TradeLicenseDraft,
    ) -> Result<i32, CustomerPersistenceError> {
        let row = trade_license_to_row(draft);
        self.pool
            .write(|mut conn| async move {
                diesel::insert_into(trade_licenses::table)
                    .values(&row)
                    .returning(trade_licenses::trade_license_id)
                    .get_result::<i32>(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)
    }

    async fn partners_for(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Partner>, CustomerPersistenceError> {
        let rows = self
            .pool
            .read(|mut conn| async move {
                partners::table
                    .filter(partners::customer_id.eq(customer_id))
                    .order(partners::partner_id.asc())
                    .select(PartnerRow::as_select())
                    .load(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(row_to_partner).collect())
    }

    async fn insert_partner(&self, draft: &PartnerDraft) -> Result<i32, CustomerPersistenceError> {
        let row = partner_to_row(draft);
        self.pool
            .write(|mut conn| async move {
                diesel::insert_into(partners::table)
                    .values(&row)
                    .returning(partners::partner_id)
                    .get_result::<i32>(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)
    }

    async fn memoranda_for(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Memorandum>, CustomerPersistenceError> {
        let rows = self
            .pool
            .read(|mut conn| async move {
                memoranda::table
                    .filter(memoranda::customer_id.eq(customer_id))
                    .order(memoranda::memorandum_id.asc())
                    .select(MemorandumRow::as_select())
                    .load(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(row_to_memorandum).collect())
    }

    async fn insert_memorandum(
        &self,
        draft: &MemorandumDraft,
    ) -> Result<i32, CustomerPersistenceError> {
        let row = memorandum_to_row(draft);
        self.pool
            .write(|mut conn| async move {
                diesel::insert_into(memoranda::table)
                    .values(&row)
                    .returning(memoranda::memorandum_id)
                    .get_result::<i32>(&mut conn)
                    .await
            })
            .await
            .map_err(map_db_error)
    }
}
