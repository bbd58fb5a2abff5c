use uuid::Uuid;

use crate::application::links::LinkError;
use crate::application::ports::link_repository::LinkRepository;

pub struct DeleteLink<'a, L: LinkRepository + ?Sized> {
    pub links: &'a L,
}

impl<'a, L: LinkRepository + ?Sized> DeleteLink<'a, L> {
    pub async fn execute(&self, user_id: Uuid, link_id: Uuid) -> Result<(), LinkError> {
        self.links
            .get_by_id(link_id)
            .await
            .map_err(LinkError::Database)?
            .filter(|link| link.user_id == user_id)
            .ok_or(LinkError::LinkNotFound)?;

        let removed = self
            .links
            .delete(link_id)
            .await
            .map_err(LinkError::Database)?;
        if removed {
            Ok(())
        } else {
            Err(LinkError::LinkNotFound)
        }
    }
}
