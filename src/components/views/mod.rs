mod account;
mod home;
mod login;
mod register;

pub use account::AccountView;
pub use home::HomeView;
pub use login::LoginView;
pub use register::RegisterView;
