use sea_orm::entity::prelude::*;

/// Exactly one of `day_of_week` (0 = Monday) and `specific_date` is set
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "availabilities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub professor_id: Uuid,
    pub day_of_week: Option<i16>,
    pub specific_date: Option<Date>,
    pub start_time: Time,
    pub end_time: Time,
    pub is_recurring: bool,
    pub is_active: bool,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
