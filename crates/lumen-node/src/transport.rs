//! UDP transport: bind, per-universe multicast join/leave, send/receive.

use std::{
    collections::HashMap,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
};

use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::error::TransportError;

/// The well-known E1.31 UDP port.
pub const E131_PORT: u16 = 5568;

/// Default multicast TTL for outbound datagrams.
pub const DEFAULT_TTL: u32 = 1;

/// Largest UDP datagram this transport expects: preamble(16) + root
/// header(22) + framing header(77) + DMP PDU(523) for a full 512-slot
/// universe.
pub const MAX_DATAGRAM_LEN: usize = 16 + 22 + 77 + 523;

/// Multicast group address for `universe` (`239.255.(u>>8).(u&0xFF)`).
#[must_use]
pub fn multicast_group(universe: u16) -> Ipv4Addr {
    Ipv4Addr::new(239, 255, (universe >> 8) as u8, (universe & 0xFF) as u8)
}

/// UDP transport bound to one local address, with per-universe multicast
/// join refcounting.
pub struct Transport {
    socket: UdpSocket,
    interface: Ipv4Addr,
    join_refcounts: HashMap<u16, usize>,
}

impl Transport {
    /// Bind a UDP socket at `bind_addr` (interface) on `port` (normally
    /// [`E131_PORT`]), with `socket2` multicast support. Bind failure is
    /// fatal.
    pub async fn bind(bind_addr: Ipv4Addr, port: u16) -> Result<Self, TransportError> {
        let addr = SocketAddr::V4(SocketAddrV4::new(bind_addr, port));

        let socket2 = socket2::Socket::new(
            socket2::Domain::IPV4,
            socket2::Type::DGRAM,
            Some(socket2::Protocol::UDP),
        )
        .map_err(TransportError::Fatal)?;
        socket2.set_reuse_address(true).map_err(TransportError::Fatal)?;
        socket2.set_nonblocking(true).map_err(TransportError::Fatal)?;
        socket2.set_multicast_ttl_v4(DEFAULT_TTL).map_err(TransportError::Fatal)?;
        socket2.bind(&addr.into()).map_err(TransportError::Fatal)?;

        let std_socket: std::net::UdpSocket = socket2.into();
        let socket = UdpSocket::from_std(std_socket).map_err(TransportError::Fatal)?;

        info!(%addr, "transport bound");
        Ok(Self { socket, interface: bind_addr, join_refcounts: HashMap::new() })
    }

    /// The address this transport is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket.local_addr().map_err(TransportError::Fatal)
    }

    /// Join the multicast group for `universe` if this is the first
    /// registration; otherwise only bumps the refcount.
    pub fn join(&mut self, universe: u16) -> Result<(), TransportError> {
        let count = self.join_refcounts.entry(universe).or_insert(0);
        if *count == 0 {
            let group = multicast_group(universe);
            self.socket.join_multicast_v4(group, self.interface).map_err(|e| {
                warn!(universe, %group, error = %e, "failed to join multicast group");
                TransportError::Transient(e)
            })?;
            info!(universe, %group, "joined multicast group");
        }
        *count += 1;
        Ok(())
    }

    /// Release one registration for `universe`; leaves the multicast group
    /// once the refcount reaches zero.
    pub fn leave(&mut self, universe: u16) -> Result<(), TransportError> {
        let Some(count) = self.join_refcounts.get_mut(&universe) else {
            return Ok(());
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.join_refcounts.remove(&universe);
            let group = multicast_group(universe);
            self.socket.leave_multicast_v4(group, self.interface).map_err(|e| {
                warn!(universe, %group, error = %e, "failed to leave multicast group");
                TransportError::Transient(e)
            })?;
            info!(universe, %group, "left multicast group");
        }
        Ok(())
    }

    /// Send one datagram to `universe`'s multicast group.
    ///
    /// Failure is logged by the caller and reported as a transient error;
    /// it never stops the node.
    pub async fn send_to_universe(
        &self,
        universe: u16,
        datagram: &[u8],
    ) -> Result<(), TransportError> {
        let dest = SocketAddr::V4(SocketAddrV4::new(multicast_group(universe), E131_PORT));
        self.socket.send_to(datagram, dest).await?;
        Ok(())
    }

    /// Receive one datagram, blocking until one arrives.
    pub async fn recv(&self, buf: &mut [u8; MAX_DATAGRAM_LEN]) -> Result<usize, TransportError> {
        let (len, _from) = self.socket.recv_from(buf).await?;
        Ok(len)
    }
}
