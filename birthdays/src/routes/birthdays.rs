use actix_web::{get, post, web, HttpResponse, http::header};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::error::AppError;
use crate::models::birthdays::{self, Entity as Birthdays, NewBirthday, RemoveBirthday};

/// GET / - Toutes les dates, relues à chaque requête
#[get("/")]
pub async fn list(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let rows = Birthdays::find()
        .order_by_asc(birthdays::Column::Id)
        .all(db.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// POST / - Ajouter une date (aucune validation du jour/mois)
#[post("/")]
pub async fn add(
    form: web::Form<NewBirthday>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let row = birthdays::ActiveModel {
        name: Set(form.name),
        month: Set(form.month),
        day: Set(form.day),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await?;

    tracing::info!(id = row.id, "birthday added");
    Ok(redirect_home())
}

/// POST /removeBirthday - Supprimer par id (id inconnu: sans effet)
#[post("/removeBirthday")]
pub async fn remove(
    form: web::Form<RemoveBirthday>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let deleted = Birthdays::delete_by_id(form.id)
        .exec(db.get_ref())
        .await?;

    tracing::info!(id = form.id, rows = deleted.rows_affected, "birthday removed");
    Ok(redirect_home())
}

fn redirect_home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

// Erreurs de décodage des formulaires: même format JSON que les autres erreurs
fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| {
        tracing::warn!(error = %err, "rejected form");
        AppError::Validation("Invalid form data.".to_string()).into()
    })
}

pub fn birthday_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(form_config())
        .service(list)
        .service(add)
        .service(remove);
}
