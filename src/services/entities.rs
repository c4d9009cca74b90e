// Entity management: companies and projects in the tree pane.
// Names are the identity at each level, so uniqueness is enforced here.

use crate::error::AppError;
use crate::state::AppState;
use crate::types::{Company, Project};

pub fn add_company(state: &AppState, nombre: &str) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        if db.empresas.iter().any(|c| c.nombre == nombre) {
            return Err(AppError::DuplicateCompany(nombre.to_string()));
        }
        db.empresas.push(Company::new(nombre));
        log::info!("Company added: {}", nombre);
        Ok(())
    })
}

pub fn rename_company(state: &AppState, nombre: &str, new_name: &str) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        if db.empresas.iter().any(|c| c.nombre == new_name && c.nombre != nombre) {
            return Err(AppError::DuplicateCompany(new_name.to_string()));
        }
        let company = db.company_mut(nombre)?;
        company.nombre = new_name.to_string();
        Ok(())
    })
}

/// Remove a company and everything under it.
pub fn delete_company(state: &AppState, nombre: &str) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        let before = db.empresas.len();
        db.empresas.retain(|c| c.nombre != nombre);
        if db.empresas.len() == before {
            return Err(AppError::UnknownCompany(nombre.to_string()));
        }
        log::info!("Company removed: {}", nombre);
        Ok(())
    })
}

pub fn add_project(state: &AppState, empresa: &str, nombre: &str) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        let company = db.company_mut(empresa)?;
        if company.proyectos.iter().any(|p| p.nombre == nombre) {
            return Err(AppError::DuplicateProject(nombre.to_string()));
        }
        company.proyectos.push(Project::new(nombre));
        log::info!("Project added: {}/{}", empresa, nombre);
        Ok(())
    })
}

pub fn rename_project(
    state: &AppState,
    empresa: &str,
    nombre: &str,
    new_name: &str,
) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        let company = db.company_mut(empresa)?;
        if company
            .proyectos
            .iter()
            .any(|p| p.nombre == new_name && p.nombre != nombre)
        {
            return Err(AppError::DuplicateProject(new_name.to_string()));
        }
        let project = company
            .project_mut(nombre)
            .ok_or_else(|| AppError::UnknownProject(nombre.to_string()))?;
        project.nombre = new_name.to_string();
        Ok(())
    })
}

/// Remove a project and all of its weeks.
pub fn delete_project(state: &AppState, empresa: &str, nombre: &str) -> Result<(), AppError> {
    state.with_db_mut(|db| {
        let company = db.company_mut(empresa)?;
        let before = company.proyectos.len();
        company.proyectos.retain(|p| p.nombre != nombre);
        if company.proyectos.len() == before {
            return Err(AppError::UnknownProject(nombre.to_string()));
        }
        log::info!("Project removed: {}/{}", empresa, nombre);
        Ok(())
    })
}
