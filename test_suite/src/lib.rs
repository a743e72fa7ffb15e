#[cfg(test)]
mod derive;
#[cfg(test)]
mod models;
#[cfg(test)]
mod request;
