use sea_orm::DeriveIden;

// ----- Iden enums for tables & columns -----
#[derive(DeriveIden)]
pub enum PlayerAccounts {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Password,
    PreferredTeam,
    ExperienceLevel,
    Bio,
    PhotoUrl,
    PlayerId,
    PaymentStatus,
    PaymentDate,
    TransactionCode,
    Status,
    ProfileCompleted,
    RegistrationDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Payments {
    Table,
    Id,
    PlayerAccountId,
    Amount,
    Phone,
    Reference,
    CheckoutRequestId,
    MerchantRequestId,
    TransactionCode,
    Status,
    PaymentType,
    ErrorMessage,
    CreatedAt,
    CompletedAt,
}

/// Owned by the league app, not created here. Only the link column is touched.
#[derive(DeriveIden)]
pub enum Players {
    Table,
    PlayerAccountId,
}

#[derive(DeriveIden)]
pub(crate) enum InformationSchema {
    #[sea_orm(iden = "information_schema")]
    Schema,
    Tables,
    Columns,
    TableSchema,
    TableName,
    ColumnName,
}
