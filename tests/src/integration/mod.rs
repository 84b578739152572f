mod delivery_flow;
mod feedback_flow;
mod http_transport;
mod pickup_flow;
