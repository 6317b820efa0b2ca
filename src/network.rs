//
// SPDX-License-Identifier: MIT
//

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;

/// Owns the single datagram socket used for both advertisement transmission
/// and reception. Exclusively owned by the event loop; never shared.
pub struct Network {
    socket: UdpSocket,
}

impl Network {
    pub async fn bind(port: u16) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port)).await?;
        Ok(Network { socket })
    }

    pub async fn send(&self, buf: &[u8], dst: SocketAddr) -> std::io::Result<()> {
        self.socket.send_to(buf, dst).await.map(|_| ())
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receives one datagram, bounded by `timeout`. Returns `None` if no
    /// datagram arrived before the bound elapsed — the normal idle case.
    pub async fn recv_timeout(
        &self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Option<std::io::Result<(usize, SocketAddr)>> {
        tokio::time::timeout(timeout, self.socket.recv_from(buf))
            .await
            .ok()
    }
}
