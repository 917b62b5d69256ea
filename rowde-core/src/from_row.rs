use crate::row::Row;

/// A record that can be built from a [`Row`].
///
/// Implement it by hand when a record needs full control over how it reads its columns,
/// or derive it with `#[derive(FromRow)]`, declaring for every field whether it is a
/// scalar column, a nested scope, or decoded through serde.
///
/// ```rust
/// use rowde_core::{FromRow, Row};
///
/// struct Player {
///     id: i64,
///     name: String,
///     score: Option<i32>,
/// }
///
/// impl FromRow for Player {
///     fn from_row(row: &Row) -> rowde_core::Result<Self> {
///         let view = row.keyed();
///
///         Ok(Player {
///             id: view.get("id")?,
///             name: view.get("name")?,
///             score: view.get_optional("score")?,
///         })
///     }
/// }
///
/// let row = Row::new().with_column("id", 1).with_column("name", "Arthur");
/// let player: Player = row.decode()?;
///
/// assert_eq!(player.score, None);
/// # Ok::<(), rowde_core::Error>(())
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> crate::Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> crate::Result<Self> {
        Ok(row.clone())
    }
}
