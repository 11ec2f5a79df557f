//! Per-row callbacks exposed through the row action menu.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    View,
    Edit,
    Delete,
    /// Plain activation of a row; never listed in the menu
    RowClick,
}

impl RowAction {
    /// Actions offered in the contextual menu, in display order
    pub const MENU: [RowAction; 3] = [RowAction::View, RowAction::Edit, RowAction::Delete];

    pub fn label(self) -> &'static str {
        match self {
            RowAction::View => "View",
            RowAction::Edit => "Edit",
            RowAction::Delete => "Delete",
            RowAction::RowClick => "Open",
        }
    }

    /// Keyboard shortcut shown next to the menu entry
    pub fn shortcut(self) -> char {
        match self {
            RowAction::View => 'v',
            RowAction::Edit => 'e',
            RowAction::Delete => 'd',
            RowAction::RowClick => '\n',
        }
    }
}

type Callback<R> = Box<dyn FnMut(&R)>;

/// Caller-supplied callbacks; each receives the addressed row only.
pub struct RowActions<R> {
    on_view: Option<Callback<R>>,
    on_edit: Option<Callback<R>>,
    on_delete: Option<Callback<R>>,
    on_row_click: Option<Callback<R>>,
}

impl<R> Default for RowActions<R> {
    fn default() -> Self {
        Self {
            on_view: None,
            on_edit: None,
            on_delete: None,
            on_row_click: None,
        }
    }
}

impl<R> RowActions<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_view(mut self, f: impl FnMut(&R) + 'static) -> Self {
        self.on_view = Some(Box::new(f));
        self
    }

    pub fn on_edit(mut self, f: impl FnMut(&R) + 'static) -> Self {
        self.on_edit = Some(Box::new(f));
        self
    }

    pub fn on_delete(mut self, f: impl FnMut(&R) + 'static) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    pub fn on_row_click(mut self, f: impl FnMut(&R) + 'static) -> Self {
        self.on_row_click = Some(Box::new(f));
        self
    }

    fn slot(&mut self, action: RowAction) -> &mut Option<Callback<R>> {
        match action {
            RowAction::View => &mut self.on_view,
            RowAction::Edit => &mut self.on_edit,
            RowAction::Delete => &mut self.on_delete,
            RowAction::RowClick => &mut self.on_row_click,
        }
    }

    pub fn supports(&self, action: RowAction) -> bool {
        match action {
            RowAction::View => self.on_view.is_some(),
            RowAction::Edit => self.on_edit.is_some(),
            RowAction::Delete => self.on_delete.is_some(),
            RowAction::RowClick => self.on_row_click.is_some(),
        }
    }

    /// Menu entries backed by a callback
    pub fn menu(&self) -> Vec<RowAction> {
        RowAction::MENU
            .into_iter()
            .filter(|a| self.supports(*a))
            .collect()
    }

    /// Whether the table needs an actions column
    pub fn has_menu(&self) -> bool {
        RowAction::MENU.iter().any(|a| self.supports(*a))
    }

    /// Invoke the callback for `action`; false when none is registered
    pub fn invoke(&mut self, action: RowAction, row: &R) -> bool {
        match self.slot(action) {
            Some(callback) => {
                callback(row);
                true
            }
            None => false,
        }
    }
}

impl<R> fmt::Debug for RowActions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowActions")
            .field("view", &self.on_view.is_some())
            .field("edit", &self.on_edit.is_some())
            .field("delete", &self.on_delete.is_some())
            .field("row_click", &self.on_row_click.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_menu_lists_supplied_actions_in_order() {
        let actions: RowActions<u32> = RowActions::new().on_delete(|_| {}).on_view(|_| {});
        assert_eq!(actions.menu(), vec![RowAction::View, RowAction::Delete]);
        assert!(actions.has_menu());
    }

    #[test]
    fn test_row_click_alone_has_no_menu() {
        let actions: RowActions<u32> = RowActions::new().on_row_click(|_| {});
        assert!(!actions.has_menu());
        assert!(actions.supports(RowAction::RowClick));
    }

    #[test]
    fn test_invoke_passes_row() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut actions = RowActions::new().on_edit(move |row: &u32| sink.borrow_mut().push(*row));

        assert!(actions.invoke(RowAction::Edit, &7));
        assert!(!actions.invoke(RowAction::Delete, &7));
        assert_eq!(*seen.borrow(), vec![7]);
    }
}
