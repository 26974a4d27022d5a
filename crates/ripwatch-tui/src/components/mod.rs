pub mod history;
pub mod now_playing;
pub mod playlists;
pub mod submit_form;
pub mod tracks;
