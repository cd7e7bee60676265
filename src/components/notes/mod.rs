pub(crate) mod modal;
pub(crate) mod note_form;
pub(crate) mod note_list;
pub(crate) mod pagination;
pub(crate) mod search_box;
pub(crate) mod tag_menu;
pub(crate) mod toasts;

pub(crate) use modal::Modal;
pub(crate) use note_form::NoteFormView;
pub(crate) use note_list::NoteList;
pub(crate) use pagination::Pagination;
pub(crate) use search_box::SearchBox;
pub(crate) use tag_menu::TagMenu;
pub(crate) use toasts::ToastStack;
